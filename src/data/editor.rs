use std::collections::{HashMap, HashSet};

use thiserror::Error;

use super::model::{CellValue, Field, RowId, Schema, SchemaError, Table, YEAR};

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("edited columns {found:?} do not match {expected:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("column '{column}' changed type from {expected} to {found}")]
    KindMismatch {
        column: String,
        expected: String,
        found: String,
    },
    #[error("row {0} appears more than once in the edited table")]
    DuplicateRow(RowId),
    #[error("row {row}: '{value}' is not valid for column '{column}'")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Row counts reported back to the user after a successful merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub updated: usize,
    pub appended: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub table: Table,
    pub summary: MergeSummary,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Write an edited copy back over the canonical table.
///
/// Rows are aligned by [`RowId`]. Aligned rows take every edited value except
/// `year`, which always stays canonical. Edited rows with an unknown id are
/// appended with fresh ids; canonical rows the edit dropped are removed.
pub fn merge(canonical: &Table, edited: &Table) -> Result<MergeOutcome, MergeError> {
    check_columns(canonical.schema(), edited.schema())?;

    let by_id: HashMap<RowId, &_> = canonical.records().iter().map(|r| (r.id, r)).collect();
    let mut next_id = canonical.max_row_id().map_or(0, |id| id + 1);
    let mut seen = HashSet::new();
    let mut summary = MergeSummary::default();
    let mut records = Vec::with_capacity(edited.len());

    for rec in edited.records() {
        let mut rec = rec.clone();
        match by_id.get(&rec.id) {
            Some(base) => {
                if !seen.insert(rec.id) {
                    return Err(MergeError::DuplicateRow(rec.id));
                }
                rec.year = base.year;
                if rec != **base {
                    summary.updated += 1;
                }
            }
            None => {
                rec.id = next_id;
                next_id += 1;
                summary.appended += 1;
            }
        }
        records.push(rec);
    }
    summary.removed = canonical.len() - seen.len();

    Ok(MergeOutcome {
        table: Table::new(canonical.schema().clone(), records),
        summary,
    })
}

fn check_columns(canonical: &Schema, edited: &Schema) -> Result<(), MergeError> {
    let expected = canonical.column_names();
    let found = edited.column_names();
    if expected != found {
        return Err(MergeError::ColumnMismatch {
            expected: expected.into_iter().map(String::from).collect(),
            found: found.into_iter().map(String::from).collect(),
        });
    }
    for (a, b) in canonical.columns().iter().zip(edited.columns()) {
        if a.kind != b.kind {
            return Err(MergeError::KindMismatch {
                column: a.name.clone(),
                expected: a.kind.to_string(),
                found: b.kind.to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// EditBuffer – the text grid behind the editable view
// ---------------------------------------------------------------------------

/// One grid row. `id` is `None` for rows added in the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRow {
    pub id: Option<RowId>,
    pub cells: Vec<String>,
}

/// Editable text copy of a table, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub rows: Vec<EditRow>,
    year_col: Option<usize>,
    width: usize,
}

impl EditBuffer {
    pub fn from_table(table: &Table) -> Self {
        let width = table.schema().width();
        let rows = table
            .records()
            .iter()
            .map(|r| EditRow {
                id: Some(r.id),
                cells: (0..width)
                    .map(|col| r.get(table.schema().field(col)).to_string())
                    .collect(),
            })
            .collect();
        EditBuffer {
            rows,
            year_col: table.schema().position(YEAR),
            width,
        }
    }

    /// Whether a cell may be typed into. `year` is fixed on existing rows.
    pub fn is_editable(&self, row: usize, col: usize) -> bool {
        self.year_col != Some(col) || self.rows.get(row).is_some_and(|r| r.id.is_none())
    }

    pub fn add_row(&mut self) {
        self.rows.push(EditRow {
            id: None,
            cells: vec![String::new(); self.width],
        });
    }

    pub fn remove_row(&mut self, row: usize) {
        if row < self.rows.len() {
            self.rows.remove(row);
        }
    }

    /// Parse the grid with the canonical column kinds.
    ///
    /// Year cells of existing rows are skipped: they are never written back, so
    /// whatever the grid holds there cannot block a merge.
    pub fn to_table(&self, schema: &Schema) -> Result<Table, MergeError> {
        let mut records = Vec::with_capacity(self.rows.len());
        for (i, row) in self.rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(schema.width());
            for (col, column) in schema.columns().iter().enumerate() {
                let text = row.cells.get(col).map(String::as_str).unwrap_or("");
                if row.id.is_some() && schema.field(col) == Field::Year {
                    cells.push(CellValue::Integer(0));
                    continue;
                }
                let value =
                    CellValue::parse(text, column.kind).ok_or_else(|| MergeError::InvalidCell {
                        row: i,
                        column: column.name.clone(),
                        value: text.to_string(),
                    })?;
                cells.push(value);
            }
            // Fresh rows are relabelled by `merge`; this id only has to be unknown.
            let id = row.id.unwrap_or(RowId::MAX);
            records.push(schema.record_from_cells(id, i, cells)?);
        }
        Ok(Table::new(schema.clone(), records))
    }
}
