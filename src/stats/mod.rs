//! Statistics module - descriptive summaries of the loaded table

mod describe;

pub use describe::{describe, ColumnInfo, Description, NumericSummary};
