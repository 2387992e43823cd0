use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use super::model::Table;

/// One long-form chart record: revenue summed for a (year, genre) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationCell {
    pub year: i64,
    pub genre: String,
    pub revenue: f64,
}

// ---------------------------------------------------------------------------
// PivotTable – year × genre matrix of summed gross
// ---------------------------------------------------------------------------

/// Sum of gross per (year, genre). Every year present in the source appears
/// with every genre present in the source; absent pairs hold zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    /// Descending.
    years: Vec<i64>,
    /// Ascending.
    genres: Vec<String>,
    /// `sums[y][g]` pairs `years[y]` with `genres[g]`.
    sums: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn years(&self) -> &[i64] {
        &self.years
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    /// Summed gross for one pair; `None` when the year or genre is absent.
    pub fn get(&self, year: i64, genre: &str) -> Option<f64> {
        let y = self.years.iter().position(|v| *v == year)?;
        let g = self.genre_index(genre)?;
        Some(self.sums[y][g])
    }

    /// `[year, revenue]` points for one genre, oldest year first.
    pub fn series(&self, genre: &str) -> Vec<[f64; 2]> {
        let Some(g) = self.genre_index(genre) else {
            return Vec::new();
        };
        self.years
            .iter()
            .zip(&self.sums)
            .rev()
            .map(|(year, row)| [*year as f64, row[g]])
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.sums.iter().flatten().sum()
    }

    fn genre_index(&self, genre: &str) -> Option<usize> {
        self.genres
            .binary_search_by(|g| g.as_str().cmp(genre))
            .ok()
    }

    /// Unpivot into long-form records: year descending, genre ascending within a year.
    pub fn melt(&self) -> Vec<AggregationCell> {
        self.years
            .iter()
            .zip(&self.sums)
            .flat_map(|(year, row)| {
                self.genres
                    .iter()
                    .zip(row)
                    .map(move |(genre, revenue)| AggregationCell {
                        year: *year,
                        genre: genre.clone(),
                        revenue: *revenue,
                    })
            })
            .collect()
    }
}

/// Group the table by (year, genre) and sum gross into a zero-filled matrix.
pub fn pivot(table: &Table) -> PivotTable {
    let mut grouped: BTreeMap<(Reverse<i64>, &str), f64> = BTreeMap::new();
    let mut genres: BTreeSet<&str> = BTreeSet::new();
    let mut years: BTreeSet<Reverse<i64>> = BTreeSet::new();

    for r in table.records() {
        *grouped.entry((Reverse(r.year), r.genre.as_str())).or_insert(0.0) += r.gross;
        genres.insert(r.genre.as_str());
        years.insert(Reverse(r.year));
    }

    let sums = years
        .iter()
        .map(|year| {
            genres
                .iter()
                .map(|genre| grouped.get(&(*year, *genre)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    PivotTable {
        years: years.into_iter().map(|Reverse(y)| y).collect(),
        genres: genres.into_iter().map(str::to_string).collect(),
        sums,
    }
}

/// Chart-ready long-form revenue per (year, genre).
pub fn aggregate(table: &Table) -> Vec<AggregationCell> {
    let cells = pivot(table).melt();
    log::debug!("Aggregated {} rows into {} cells", table.len(), cells.len());
    cells
}
