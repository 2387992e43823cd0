//! Shared table builders for unit tests.

use super::model::{CellValue, ColumnKind, Schema, Table};

/// A bare `genre, year, gross` table.
pub fn movies(rows: &[(&str, i64, f64)]) -> Table {
    let schema = Schema::new(
        vec!["genre".into(), "year".into(), "gross".into()],
        vec![ColumnKind::String, ColumnKind::Integer, ColumnKind::Float],
    )
    .unwrap();
    Table::from_rows(
        schema,
        rows.iter()
            .map(|(g, y, v)| {
                vec![
                    CellValue::String(g.to_string()),
                    CellValue::Integer(*y),
                    CellValue::Float(*v),
                ]
            })
            .collect(),
    )
    .unwrap()
}

/// `title, genre, year, gross, rating` with a pass-through text and float column.
pub fn movies_with_extras(rows: &[(&str, &str, i64, f64, Option<f64>)]) -> Table {
    let schema = Schema::new(
        vec![
            "title".into(),
            "genre".into(),
            "year".into(),
            "gross".into(),
            "rating".into(),
        ],
        vec![
            ColumnKind::String,
            ColumnKind::String,
            ColumnKind::Integer,
            ColumnKind::Float,
            ColumnKind::Float,
        ],
    )
    .unwrap();
    Table::from_rows(
        schema,
        rows.iter()
            .map(|(t, g, y, v, r)| {
                vec![
                    CellValue::String(t.to_string()),
                    CellValue::String(g.to_string()),
                    CellValue::Integer(*y),
                    CellValue::Float(*v),
                    r.map(CellValue::Float).unwrap_or(CellValue::Null),
                ]
            })
            .collect(),
    )
    .unwrap()
}
