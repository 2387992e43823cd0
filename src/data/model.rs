use std::collections::{BTreeSet, HashSet};
use std::fmt;

use thiserror::Error;

/// Column holding the categorical genre label.
pub const GENRE: &str = "genre";
/// Column holding the release year (read-only when editing).
pub const YEAR: &str = "year";
/// Column holding gross revenue.
pub const GROSS: &str = "gross";

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}: column '{column}' is empty")]
    NullValue { column: String, row: usize },
    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// ColumnKind / CellValue
// ---------------------------------------------------------------------------

/// The closed set of column types a table can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKind {
    String,
    Integer,
    Float,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Dtype name used in the schema report.
    pub fn dtype(self) -> &'static str {
        match self {
            ColumnKind::String => "object",
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dtype())
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Parse user text into a cell of the given kind. Blank text is `Null`.
    pub fn parse(text: &str, kind: ColumnKind) -> Option<CellValue> {
        let text = text.trim();
        if text.is_empty() {
            return Some(CellValue::Null);
        }
        match kind {
            ColumnKind::String => Some(CellValue::String(text.to_string())),
            ColumnKind::Integer => text.parse().ok().map(CellValue::Integer),
            ColumnKind::Float => text.parse().ok().map(CellValue::Float),
        }
    }

    /// Convert into `kind`, or `None` when the value cannot be represented.
    pub fn coerce(self, kind: ColumnKind) -> Option<CellValue> {
        match (self, kind) {
            (CellValue::Null, _) => Some(CellValue::Null),
            (CellValue::String(s), ColumnKind::String) => Some(CellValue::String(s)),
            (v @ (CellValue::Integer(_) | CellValue::Float(_)), ColumnKind::String) => {
                Some(CellValue::String(v.to_string()))
            }
            (CellValue::Integer(i), ColumnKind::Integer) => Some(CellValue::Integer(i)),
            // `as` saturates; out-of-range floats are rejected instead.
            (CellValue::Float(v), ColumnKind::Integer) => (v.fract() == 0.0
                && v >= i64::MIN as f64
                && v < i64::MAX as f64)
                .then_some(CellValue::Integer(v as i64)),
            (CellValue::Integer(i), ColumnKind::Float) => Some(CellValue::Float(i as f64)),
            (CellValue::Float(v), ColumnKind::Float) => Some(CellValue::Float(v)),
            (CellValue::String(s), kind) => CellValue::parse(&s, kind),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – ordered columns plus the required-field layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Where a column's values live inside a [`Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Genre,
    Year,
    Gross,
    Extra(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema from header names and inferred kinds.
    ///
    /// The required columns are located by name and their kinds forced to
    /// String / Integer / Float; all other columns keep their inferred kind.
    pub fn new(names: Vec<String>, kinds: Vec<ColumnKind>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SchemaError::DuplicateColumn(name.clone()));
            }
        }
        for required in [GENRE, YEAR, GROSS] {
            if !seen.contains(required) {
                return Err(SchemaError::MissingColumn(required));
            }
        }

        let mut columns = Vec::with_capacity(names.len());
        let mut fields = Vec::with_capacity(names.len());
        let mut extras = 0;
        for (name, kind) in names.into_iter().zip(kinds) {
            let (field, kind) = match name.as_str() {
                GENRE => (Field::Genre, ColumnKind::String),
                YEAR => (Field::Year, ColumnKind::Integer),
                GROSS => (Field::Gross, ColumnKind::Float),
                _ => {
                    extras += 1;
                    (Field::Extra(extras - 1), kind)
                }
            };
            columns.push(Column { name, kind });
            fields.push(field);
        }
        Ok(Schema { columns, fields })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn field(&self, col: usize) -> Field {
        self.fields[col]
    }

    /// Turn one row of cells (in column order) into a typed record.
    /// `row` is only used for error messages.
    pub fn record_from_cells(
        &self,
        id: RowId,
        row: usize,
        cells: Vec<CellValue>,
    ) -> Result<Record, SchemaError> {
        if cells.len() != self.columns.len() {
            return Err(SchemaError::RowWidth {
                row,
                expected: self.columns.len(),
                found: cells.len(),
            });
        }

        let mut genre = None;
        let mut year = None;
        let mut gross = None;
        let mut extra = vec![CellValue::Null; self.fields.len() - 3];

        for ((cell, column), field) in cells.into_iter().zip(&self.columns).zip(&self.fields) {
            if !matches!(field, Field::Extra(_)) && cell.is_null() {
                return Err(SchemaError::NullValue {
                    column: column.name.clone(),
                    row,
                });
            }
            let original = cell.to_string();
            let invalid = || SchemaError::InvalidValue {
                column: column.name.clone(),
                row,
                value: original.clone(),
            };
            let value = cell.coerce(column.kind).ok_or_else(invalid)?;
            match (field, value) {
                (Field::Genre, CellValue::String(s)) => genre = Some(s),
                (Field::Year, CellValue::Integer(y)) => year = Some(y),
                (Field::Gross, CellValue::Float(g)) if g.is_finite() && g >= 0.0 => {
                    gross = Some(g)
                }
                (Field::Extra(slot), value) => extra[*slot] = value,
                _ => return Err(invalid()),
            }
        }

        match (genre, year, gross) {
            (Some(genre), Some(year), Some(gross)) => Ok(Record {
                id,
                genre,
                year,
                gross,
                extra,
            }),
            (None, _, _) => Err(SchemaError::MissingColumn(GENRE)),
            (_, None, _) => Err(SchemaError::MissingColumn(YEAR)),
            (_, _, None) => Err(SchemaError::MissingColumn(GROSS)),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// Stable row label. Assigned 0..n on load and carried through filters and edits.
pub type RowId = usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RowId,
    pub genre: String,
    pub year: i64,
    pub gross: f64,
    /// Pass-through columns, indexed by [`Field::Extra`] slot.
    pub extra: Vec<CellValue>,
}

impl Record {
    pub fn get(&self, field: Field) -> CellValue {
        match field {
            Field::Genre => CellValue::String(self.genre.clone()),
            Field::Year => CellValue::Integer(self.year),
            Field::Gross => CellValue::Float(self.gross),
            Field::Extra(slot) => self.extra[slot].clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – schema plus ordered records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Table { schema, records }
    }

    /// Build a table from raw rows in column order, labelling rows 0..n.
    pub fn from_rows(schema: Schema, rows: Vec<Vec<CellValue>>) -> Result<Self, SchemaError> {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| schema.record_from_cells(i, i, cells))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Table { schema, records })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> CellValue {
        self.records[row].get(self.schema.field(col))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, col: usize) -> Vec<CellValue> {
        let field = self.schema.field(col);
        self.records.iter().map(|r| r.get(field)).collect()
    }

    /// A new table with the same schema keeping only the records that pass `keep`.
    pub fn filtered<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Record) -> bool,
    {
        Table {
            schema: self.schema.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            schema: self.schema.clone(),
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    pub fn genres(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.genre.clone()).collect()
    }

    pub fn years(&self) -> BTreeSet<i64> {
        self.records.iter().map(|r| r.year).collect()
    }

    pub fn max_row_id(&self) -> Option<RowId> {
        self.records.iter().map(|r| r.id).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    fn movie_schema() -> Schema {
        Schema::new(
            names(&["title", "genre", "year", "gross"]),
            vec![
                ColumnKind::String,
                ColumnKind::String,
                ColumnKind::Integer,
                ColumnKind::Integer,
            ],
        )
        .unwrap()
    }

    #[test]
    fn required_column_kinds_are_forced() {
        let schema = movie_schema();
        let kinds: Vec<ColumnKind> = schema.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::String,
                ColumnKind::String,
                ColumnKind::Integer,
                ColumnKind::Float
            ]
        );
        assert_eq!(schema.field(0), Field::Extra(0));
        assert_eq!(schema.field(3), Field::Gross);
    }

    #[test]
    fn missing_and_duplicate_columns_are_rejected() {
        let err = Schema::new(names(&["genre", "year"]), vec![ColumnKind::String; 2]);
        assert_eq!(err, Err(SchemaError::MissingColumn(GROSS)));

        let err = Schema::new(
            names(&["genre", "year", "gross", "year"]),
            vec![ColumnKind::String; 4],
        );
        assert_eq!(err, Err(SchemaError::DuplicateColumn("year".into())));
    }

    #[test]
    fn rows_are_typed_and_labelled() {
        let table = Table::from_rows(
            movie_schema(),
            vec![
                vec![
                    CellValue::String("Heat".into()),
                    CellValue::String("Drama".into()),
                    CellValue::Float(1995.0),
                    CellValue::Integer(187),
                ],
                vec![
                    CellValue::Null,
                    CellValue::Integer(7),
                    CellValue::String("2001".into()),
                    CellValue::String("12.5".into()),
                ],
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let second = &table.records()[1];
        assert_eq!(second.id, 1);
        assert_eq!(second.genre, "7");
        assert_eq!(second.year, 2001);
        assert_eq!(second.gross, 12.5);
        assert_eq!(second.extra, vec![CellValue::Null]);
        assert_eq!(table.cell(0, 3), CellValue::Float(187.0));
    }

    #[test]
    fn invalid_required_values_name_the_row() {
        let schema = movie_schema();
        let row = |year: CellValue, gross: CellValue| {
            vec![
                CellValue::String("x".into()),
                CellValue::String("Drama".into()),
                year,
                gross,
            ]
        };

        let err = Table::from_rows(schema.clone(), vec![row(CellValue::Null, CellValue::Float(1.0))]);
        assert_eq!(
            err,
            Err(SchemaError::NullValue {
                column: "year".into(),
                row: 0
            })
        );

        let err = Table::from_rows(
            schema.clone(),
            vec![row(CellValue::Integer(2000), CellValue::Float(-3.0))],
        );
        assert!(matches!(err, Err(SchemaError::InvalidValue { row: 0, .. })));

        let err = Table::from_rows(
            schema,
            vec![row(CellValue::Float(2000.5), CellValue::Float(3.0))],
        );
        assert!(matches!(err, Err(SchemaError::InvalidValue { .. })));
    }

    #[test]
    fn cell_parse_respects_kind() {
        assert_eq!(
            CellValue::parse(" 42 ", ColumnKind::Integer),
            Some(CellValue::Integer(42))
        );
        assert_eq!(CellValue::parse("4.2", ColumnKind::Integer), None);
        assert_eq!(CellValue::parse("", ColumnKind::Float), Some(CellValue::Null));
        assert_eq!(
            CellValue::Integer(3).coerce(ColumnKind::String),
            Some(CellValue::String("3".into()))
        );
    }

    #[test]
    fn float_to_integer_rejects_out_of_range() {
        assert_eq!(
            CellValue::Float(2001.0).coerce(ColumnKind::Integer),
            Some(CellValue::Integer(2001))
        );
        assert_eq!(CellValue::Float(1e20).coerce(ColumnKind::Integer), None);
        assert_eq!(CellValue::Float(-1e20).coerce(ColumnKind::Integer), None);
        assert_eq!(CellValue::Float(i64::MAX as f64).coerce(ColumnKind::Integer), None);
        assert_eq!(CellValue::Float(f64::INFINITY).coerce(ColumnKind::Integer), None);
        assert_eq!(CellValue::Float(f64::NAN).coerce(ColumnKind::Integer), None);
    }
}
