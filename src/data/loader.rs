use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{CellValue, ColumnKind, Schema, SchemaError, Table};

// ---------------------------------------------------------------------------
// Format dispatch
// ---------------------------------------------------------------------------

/// Upload formats, resolved once from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Pick the format from the file name suffix (case-insensitive).
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Csv => f.write_str("CSV"),
            FileFormat::Json => f.write_str("JSON"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Layout(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type: {file_name} (expected .csv or .json)")]
    UnsupportedFormat { file_name: String },
    #[error("failed to parse {format} data")]
    ParseFailure {
        format: FileFormat,
        #[source]
        source: ParseError,
    },
    #[error("data does not match the movie schema")]
    SchemaMismatch(#[from] SchemaError),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an uploaded byte stream into a [`Table`]. Dispatch by file name.
///
/// Supported formats:
/// * `.csv`  – header row followed by data rows
/// * `.json` – records (`[{..}, ..]`) or columns (`{"col": {"0": ..}}`) orientation
///
/// Failures are returned whole; nothing partially parsed escapes.
pub fn load(bytes: &[u8], file_name: &str) -> Result<Table, LoadError> {
    let result = match FileFormat::from_file_name(file_name) {
        Some(format) => parse(bytes, format),
        None => Err(LoadError::UnsupportedFormat {
            file_name: file_name.to_string(),
        }),
    };

    if let Ok(table) = &result {
        log::info!(
            "Loaded {file_name}: {} rows, columns {:?}",
            table.len(),
            table.schema().column_names()
        );
    }
    result
}

/// Read a file from disk and [`load`] it.
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(format) = FileFormat::from_file_name(&file_name) else {
        return load(&[], &file_name);
    };
    let bytes = std::fs::read(path).map_err(|e| LoadError::ParseFailure {
        format,
        source: ParseError::Io(e),
    })?;
    load(&bytes, &file_name)
}

fn parse(bytes: &[u8], format: FileFormat) -> Result<Table, LoadError> {
    let wrap = |source: ParseError| LoadError::ParseFailure { format, source };
    let (names, kinds, rows) = match format {
        FileFormat::Csv => parse_csv(bytes).map_err(wrap)?,
        FileFormat::Json => parse_json(bytes).map_err(wrap)?,
    };
    let schema = Schema::new(names, kinds)?;
    Ok(Table::from_rows(schema, rows)?)
}

type ParsedColumns = (Vec<String>, Vec<ColumnKind>, Vec<Vec<CellValue>>);

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Rows with a different field count are rejected rather than padded.
fn parse_csv(bytes: &[u8]) -> Result<ParsedColumns, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut raw: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        raw.push(record.iter().map(|v| v.to_string()).collect());
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|col| infer_text_kind(raw.iter().map(|row| row[col].as_str())))
        .collect();

    let rows = raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(text, kind)| text_to_cell(&text, *kind))
                .collect()
        })
        .collect();

    Ok((headers, kinds, rows))
}

fn infer_text_kind<'a>(values: impl Iterator<Item = &'a str>) -> ColumnKind {
    let mut kind = ColumnKind::Integer;
    let mut any = false;
    for v in values.filter(|v| !v.is_empty()) {
        any = true;
        if kind == ColumnKind::Integer && v.parse::<i64>().is_err() {
            kind = ColumnKind::Float;
        }
        if kind == ColumnKind::Float && v.parse::<f64>().is_err() {
            return ColumnKind::String;
        }
    }
    if any {
        kind
    } else {
        ColumnKind::String
    }
}

fn text_to_cell(text: &str, kind: ColumnKind) -> CellValue {
    if text.is_empty() {
        return CellValue::Null;
    }
    CellValue::parse(text, kind).unwrap_or_else(|| CellValue::String(text.to_string()))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layouts (the ones `DataFrame.to_json` writes):
///
/// ```json
/// [{"genre": "Drama", "year": 2001, "gross": 50.0}, ...]
/// {"genre": {"0": "Drama", "1": "Comedy"}, "year": {"0": 2001, "1": 2002}, ...}
/// {"genre": ["Drama", "Comedy"], "year": [2001, 2002], ...}
/// ```
fn parse_json(bytes: &[u8]) -> Result<ParsedColumns, ParseError> {
    let root: JsonValue = serde_json::from_slice(bytes)?;

    let (names, raw) = match root {
        JsonValue::Array(records) => json_records(records)?,
        JsonValue::Object(columns) => json_columns(columns)?,
        other => {
            return Err(ParseError::Layout(format!(
                "expected a JSON array or object at top level, found {}",
                json_type_name(&other)
            )))
        }
    };

    let kinds: Vec<ColumnKind> = (0..names.len())
        .map(|col| infer_json_kind(raw.iter().map(|row| &row[col])))
        .collect();

    let rows = raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(val, kind)| json_to_cell(val, *kind))
                .collect()
        })
        .collect();

    Ok((names, kinds, rows))
}

type JsonRows = (Vec<String>, Vec<Vec<JsonValue>>);

fn json_records(records: Vec<JsonValue>) -> Result<JsonRows, ParseError> {
    let mut names: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());

    for (i, rec) in records.into_iter().enumerate() {
        let JsonValue::Object(obj) = rec else {
            return Err(ParseError::Layout(format!("row {i} is not a JSON object")));
        };
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|mut obj| {
            names
                .iter()
                .map(|name| obj.remove(name).unwrap_or(JsonValue::Null))
                .collect()
        })
        .collect();

    Ok((names, rows))
}

/// Columns orientation. Object columns are aligned by their index labels,
/// array columns by position; a label missing from a column reads as null.
fn json_columns(columns: Map<String, JsonValue>) -> Result<JsonRows, ParseError> {
    let mut names = Vec::with_capacity(columns.len());
    let mut values: Vec<BTreeMap<u64, JsonValue>> = Vec::with_capacity(columns.len());
    let mut array_len: Option<(String, usize)> = None;

    for (name, column) in columns {
        let indexed = match column {
            JsonValue::Array(items) => {
                match &array_len {
                    Some((first, len)) if *len != items.len() => {
                        return Err(ParseError::Layout(format!(
                            "column '{name}' has {} values, column '{first}' has {len}",
                            items.len()
                        )))
                    }
                    Some(_) => {}
                    None => array_len = Some((name.clone(), items.len())),
                }
                (0u64..).zip(items).collect()
            }
            JsonValue::Object(entries) => entries
                .into_iter()
                .map(|(key, v)| {
                    key.parse::<u64>().map(|k| (k, v)).map_err(|_| {
                        ParseError::Layout(format!(
                            "column '{name}': index key '{key}' is not a row number"
                        ))
                    })
                })
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            other => {
                return Err(ParseError::Layout(format!(
                    "column '{name}' must be an array or object, found {}",
                    json_type_name(&other)
                )))
            }
        };
        names.push(name);
        values.push(indexed);
    }

    let labels: BTreeSet<u64> = values.iter().flat_map(|col| col.keys().copied()).collect();
    let rows = labels
        .iter()
        .map(|label| {
            values
                .iter_mut()
                .map(|col| col.remove(label).unwrap_or(JsonValue::Null))
                .collect()
        })
        .collect();

    Ok((names, rows))
}

fn infer_json_kind<'a>(values: impl Iterator<Item = &'a JsonValue>) -> ColumnKind {
    let mut kind = None;
    for v in values {
        let this = match v {
            JsonValue::Null => continue,
            JsonValue::Number(n) if n.is_i64() || n.is_u64() => ColumnKind::Integer,
            JsonValue::Number(_) => ColumnKind::Float,
            _ => return ColumnKind::String,
        };
        kind = Some(match (kind, this) {
            (Some(ColumnKind::Float), _) | (_, ColumnKind::Float) => ColumnKind::Float,
            _ => ColumnKind::Integer,
        });
    }
    kind.unwrap_or(ColumnKind::String)
}

fn json_to_cell(val: JsonValue, kind: ColumnKind) -> CellValue {
    match (val, kind) {
        (JsonValue::Null, _) => CellValue::Null,
        (JsonValue::String(s), _) => CellValue::String(s),
        (JsonValue::Number(n), ColumnKind::Integer) => n
            .as_i64()
            .map(CellValue::Integer)
            .unwrap_or_else(|| CellValue::String(n.to_string())),
        (JsonValue::Number(n), ColumnKind::Float) => n
            .as_f64()
            .map(CellValue::Float)
            .unwrap_or_else(|| CellValue::String(n.to_string())),
        (other, _) => CellValue::String(json_text(&other)),
    }
}

fn json_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Field;

    const MOVIES_CSV: &str = "\
title,genre,year,gross,rating
Alpha,Comedy,2001,100,7.5
Beta,Drama,2001,50,
Gamma,Comedy,2002,200,6
";

    #[test]
    fn format_is_resolved_from_suffix() {
        assert_eq!(FileFormat::from_file_name("movies.CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_file_name("dump.json"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_file_name("data.txt"), None);
        assert_eq!(FileFormat::from_file_name("csv"), None);
    }

    #[test]
    fn unsupported_suffix_is_an_error_not_a_panic() {
        let err = load(b"genre,year,gross\n", "data.txt").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat { ref file_name } if file_name == "data.txt"));
    }

    #[test]
    fn csv_columns_are_typed() {
        let table = load(MOVIES_CSV.as_bytes(), "movies.csv").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.schema().column_names(),
            vec!["title", "genre", "year", "gross", "rating"]
        );
        let kinds: Vec<ColumnKind> = table.schema().columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::String,
                ColumnKind::String,
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Float
            ]
        );

        let beta = &table.records()[1];
        assert_eq!((beta.genre.as_str(), beta.year, beta.gross), ("Drama", 2001, 50.0));
        assert_eq!(beta.extra[1], CellValue::Null);
        assert_eq!(table.cell(2, 4), CellValue::Float(6.0));
        assert_eq!(table.schema().field(1), Field::Genre);
    }

    #[test]
    fn ragged_csv_is_rejected_not_truncated() {
        let data = "genre,year,gross\nComedy,2001,100\nDrama,2002\n";
        let err = load(data.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(
            err,
            LoadError::ParseFailure {
                format: FileFormat::Csv,
                source: ParseError::Csv(_)
            }
        ));
    }

    #[test]
    fn missing_required_column_is_a_schema_mismatch() {
        let data = "genre,year,revenue\nComedy,2001,100\n";
        let err = load(data.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(
            err,
            LoadError::SchemaMismatch(SchemaError::MissingColumn("gross"))
        ));
    }

    #[test]
    fn non_numeric_year_is_a_schema_mismatch() {
        let data = "genre,year,gross\nComedy,2001,100\nDrama,soon,5\n";
        let err = load(data.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(
            err,
            LoadError::SchemaMismatch(SchemaError::InvalidValue { row: 1, .. })
        ));
    }

    #[test]
    fn json_records_orientation() {
        let data = r#"[
            {"genre": "Comedy", "year": 2001, "gross": 100, "title": "Alpha"},
            {"genre": "Drama", "year": 2001, "gross": 50.5}
        ]"#;
        let table = load(data.as_bytes(), "movies.json").unwrap();
        assert_eq!(
            table.schema().column_names(),
            vec!["genre", "year", "gross", "title"]
        );
        assert_eq!(table.records()[1].gross, 50.5);
        assert_eq!(table.records()[1].extra, vec![CellValue::Null]);
    }

    #[test]
    fn json_columns_orientation_orders_by_index() {
        let data = r#"{
            "genre": {"1": "Drama", "0": "Comedy", "10": "Horror"},
            "year": {"0": 2001, "1": 2002, "10": 2003},
            "gross": {"0": 1.5, "1": 2, "10": 3}
        }"#;
        let table = load(data.as_bytes(), "movies.json").unwrap();
        let genres: Vec<&str> = table.records().iter().map(|r| r.genre.as_str()).collect();
        assert_eq!(genres, vec!["Comedy", "Drama", "Horror"]);
        assert_eq!(table.records()[2].gross, 3.0);
    }

    #[test]
    fn json_columns_align_rows_by_index_label() {
        let data = r#"{
            "genre": {"5": "Drama", "0": "Comedy"},
            "year": {"0": 2001, "5": 2002},
            "gross": {"5": 20, "0": 10}
        }"#;
        let table = load(data.as_bytes(), "movies.json").unwrap();
        let rows: Vec<(&str, i64, f64)> = table
            .records()
            .iter()
            .map(|r| (r.genre.as_str(), r.year, r.gross))
            .collect();
        assert_eq!(rows, vec![("Comedy", 2001, 10.0), ("Drama", 2002, 20.0)]);
    }

    #[test]
    fn json_columns_with_mismatched_labels_are_rejected() {
        let data = r#"{
            "genre": {"0": "Comedy", "1": "Drama"},
            "year": {"0": 2001, "2": 2002},
            "gross": {"0": 10, "2": 20}
        }"#;
        let err = load(data.as_bytes(), "movies.json").unwrap_err();
        assert!(matches!(
            err,
            LoadError::SchemaMismatch(SchemaError::NullValue { .. })
        ));
    }

    #[test]
    fn json_year_beyond_integer_range_is_rejected() {
        let data = r#"[{"genre": "Comedy", "year": 1e20, "gross": 1}]"#;
        let err = load(data.as_bytes(), "movies.json").unwrap_err();
        assert!(matches!(
            err,
            LoadError::SchemaMismatch(SchemaError::InvalidValue { .. })
        ));
    }

    #[test]
    fn json_columns_of_unequal_length_are_rejected() {
        let data = r#"{"genre": ["Comedy"], "year": [2001, 2002], "gross": [1]}"#;
        let err = load(data.as_bytes(), "movies.json").unwrap_err();
        assert!(matches!(
            err,
            LoadError::ParseFailure {
                source: ParseError::Layout(_),
                ..
            }
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err = load(b"[{\"genre\": ", "movies.json").unwrap_err();
        assert!(matches!(
            err,
            LoadError::ParseFailure {
                format: FileFormat::Json,
                source: ParseError::Json(_)
            }
        ));
    }

    #[test]
    fn json_kind_inference_mixes_int_and_float() {
        let values = [
            JsonValue::from(1),
            JsonValue::Null,
            JsonValue::from(2.5),
            JsonValue::from(3),
        ];
        assert_eq!(infer_json_kind(values.iter()), ColumnKind::Float);
        let values = [JsonValue::from(1), JsonValue::from("x")];
        assert_eq!(infer_json_kind(values.iter()), ColumnKind::String);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{MOVIES_CSV}").unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.len(), 3);

        let missing = file.path().with_file_name("does-not-exist.csv");
        assert!(matches!(
            load_file(&missing),
            Err(LoadError::ParseFailure {
                source: ParseError::Io(_),
                ..
            })
        ));
    }
}
