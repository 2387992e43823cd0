//! Descriptive Statistics Module
//! Per-column summaries (count, mean, std, quartiles) and the schema report.

use std::collections::BTreeMap;
use std::fmt::Write;

use statrs::statistics::Statistics;

use crate::data::model::{ColumnKind, Table};

/// Summary of one numeric column. Nulls are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

/// Schema report line for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub kind: ColumnKind,
    pub non_null: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub summary: Vec<NumericSummary>,
    pub schema: Vec<ColumnInfo>,
}

/// Compute numeric summaries and the per-column report. Read-only.
pub fn describe(table: &Table) -> Description {
    let mut summary = Vec::new();
    let mut schema = Vec::with_capacity(table.schema().width());

    for (col, column) in table.schema().columns().iter().enumerate() {
        let values = table.column_values(col);
        let non_null = values.iter().filter(|v| !v.is_null()).count();
        schema.push(ColumnInfo {
            name: column.name.clone(),
            kind: column.kind,
            non_null,
            total: values.len(),
        });

        if column.kind.is_numeric() {
            let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
            summary.push(summarize(&column.name, &numbers));
        }
    }

    Description { summary, schema }
}

fn summarize(column: &str, values: &[f64]) -> NumericSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    NumericSummary {
        column: column.to_string(),
        count: values.len(),
        mean: values.mean(),
        // Sample standard deviation (n - 1); NaN below two values.
        std: values.std_dev(),
        min: quantile(&sorted, 0.0),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: quantile(&sorted, 1.0),
    }
}

/// Quantile `q` in `[0, 1]` of an ascending slice, interpolating linearly
/// between neighbouring ranks. NaN for no values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return f64::NAN;
    };
    let pos = q * last as f64;
    let below = pos.floor() as usize;
    let above = (below + 1).min(last);
    sorted[below] + (sorted[above] - sorted[below]) * (pos - below as f64)
}

impl Description {
    /// Plain-text column report: entry count, one line per column, dtype tally.
    pub fn info_text(&self) -> String {
        let rows = self.schema.first().map_or(0, |c| c.total);
        let name_width = self
            .schema
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        let mut out = String::new();
        if rows == 0 {
            let _ = writeln!(out, "Index: 0 entries");
        } else {
            let _ = writeln!(out, "Index: {rows} entries, 0 to {}", rows - 1);
        }
        let _ = writeln!(out, "Data columns (total {} columns):", self.schema.len());
        let _ = writeln!(
            out,
            " #   {:<name_width$}  Non-Null Count  Dtype",
            "Column"
        );
        let _ = writeln!(
            out,
            "---  {:<name_width$}  --------------  -----",
            "-".repeat("Column".len())
        );
        let mut dtypes: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, c) in self.schema.iter().enumerate() {
            let count = format!("{} non-null", c.non_null);
            let _ = writeln!(
                out,
                " {i:<3} {:<name_width$}  {count:<14}  {}",
                c.name,
                c.kind.dtype()
            );
            *dtypes.entry(c.kind.dtype()).or_default() += 1;
        }
        let tally: Vec<String> = dtypes.iter().map(|(d, n)| format!("{d}({n})")).collect();
        let _ = write!(out, "dtypes: {}", tally.join(", "));
        out
    }
}
