/// Data layer: core types, loading, selection, aggregation and editing.
///
/// Architecture:
/// ```text
///  .csv / .json bytes
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse upload → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table   │  Schema + Vec<Record>, owned by the Session
///   └──────────┘
///     │      │
///     ▼      ▼
///   ┌──────────┐   ┌──────────┐
///   │  filter  │   │  editor  │  EditBuffer → merge back into the Table
///   └──────────┘   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  pivot   │  year × genre sums → long-form chart cells
///   └──────────┘
/// ```

pub mod editor;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pivot;

#[cfg(test)]
pub(crate) mod fixtures;
