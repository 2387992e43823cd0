use std::collections::BTreeSet;

use super::model::{Record, Table};
use crate::config::Settings;

// ---------------------------------------------------------------------------
// Selection predicate: chosen genres plus an inclusive year range
// ---------------------------------------------------------------------------

/// Inclusive year interval. `lo <= hi` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    lo: i64,
    hi: i64,
}

impl YearRange {
    /// Reversed bounds are swapped.
    pub fn new(a: i64, b: i64) -> Self {
        YearRange {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    pub fn lo(&self) -> i64 {
        self.lo
    }

    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn contains(&self, year: i64) -> bool {
        (self.lo..=self.hi).contains(&year)
    }

    /// Clamp both ends into `bounds`.
    pub fn clamp_to(self, bounds: YearRange) -> Self {
        YearRange::new(
            self.lo.clamp(bounds.lo, bounds.hi),
            self.hi.clamp(bounds.lo, bounds.hi),
        )
    }
}

impl From<(i64, i64)> for YearRange {
    fn from((a, b): (i64, i64)) -> Self {
        YearRange::new(a, b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub genres: BTreeSet<String>,
    pub years: YearRange,
}

impl Selection {
    pub fn new(genres: BTreeSet<String>, years: YearRange) -> Self {
        Selection { genres, years }
    }

    /// Initial selection for a freshly loaded table: the editorial genres that
    /// actually occur in the data and the default year range.
    pub fn defaults(table: &Table, settings: &Settings) -> Self {
        let present = genre_options(table);
        let genres = settings
            .default_genres
            .iter()
            .filter(|g| present.contains(*g))
            .cloned()
            .collect();
        let years = YearRange::from(settings.default_years).clamp_to(year_bounds(table, settings));
        Selection { genres, years }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.genres.contains(&record.genre) && self.years.contains(record.year)
    }
}

// ---------------------------------------------------------------------------
// Widget options
// ---------------------------------------------------------------------------

/// Distinct genres present in the table.
pub fn genre_options(table: &Table) -> BTreeSet<String> {
    table.genres()
}

/// Distinct years present in the table, ascending.
pub fn year_options(table: &Table) -> Vec<i64> {
    table.years().into_iter().collect()
}

/// Slider domain: the fixed configured bounds, or the data's own range when
/// `derive_year_bounds` is set and the table is not empty.
pub fn year_bounds(table: &Table, settings: &Settings) -> YearRange {
    if settings.derive_year_bounds {
        let years = table.years();
        if let (Some(first), Some(last)) = (years.first(), years.last()) {
            return YearRange::new(*first, *last);
        }
    }
    YearRange::from(settings.year_bounds)
}

// ---------------------------------------------------------------------------
// Applying the selection
// ---------------------------------------------------------------------------

/// One flag per row: true when the row passes the selection.
pub fn selection_mask(table: &Table, selection: &Selection) -> Vec<bool> {
    table.records().iter().map(|r| selection.matches(r)).collect()
}

/// Rows whose genre is selected and whose year lies in the range.
///
/// The source table is left untouched; an empty selection yields an empty table.
pub fn apply_selection(table: &Table, selection: &Selection) -> Table {
    let filtered = table.filtered(|r| selection.matches(r));
    log::debug!(
        "Selection {:?} {}..={} kept {} of {} rows",
        selection.genres,
        selection.years.lo(),
        selection.years.hi(),
        filtered.len(),
        table.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::movies;

    fn genres(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        movies(&[
            ("Comedy", 2001, 100.0),
            ("Drama", 2001, 50.0),
            ("Comedy", 2002, 200.0),
            ("Horror", 1990, 10.0),
        ])
    }

    #[test]
    fn keeps_rows_matching_genre_and_year() {
        let table = sample();
        let sel = Selection::new(genres(&["Comedy"]), YearRange::new(2001, 2002));

        assert_eq!(selection_mask(&table, &sel), vec![true, false, true, false]);
        let out = apply_selection(&table, &sel);
        let rows: Vec<(&str, i64, f64)> = out
            .records()
            .iter()
            .map(|r| (r.genre.as_str(), r.year, r.gross))
            .collect();
        assert_eq!(rows, vec![("Comedy", 2001, 100.0), ("Comedy", 2002, 200.0)]);
        assert_eq!(out.records()[1].id, 2);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn year_range_is_inclusive_and_normalised() {
        let range = YearRange::new(2002, 2001);
        assert_eq!((range.lo(), range.hi()), (2001, 2002));
        assert!(range.contains(2001) && range.contains(2002));
        assert!(!range.contains(2003));

        let clamped = YearRange::new(1950, 2030).clamp_to(YearRange::new(1986, 2016));
        assert_eq!((clamped.lo(), clamped.hi()), (1986, 2016));
    }

    #[test]
    fn empty_selection_is_an_empty_table() {
        let table = sample();
        let none = Selection::new(BTreeSet::new(), YearRange::new(1986, 2016));
        assert!(apply_selection(&table, &none).is_empty());

        let no_overlap = Selection::new(genre_options(&table), YearRange::new(2010, 2016));
        let out = apply_selection(&table, &no_overlap);
        assert!(out.is_empty());
        assert_eq!(out.schema(), table.schema());
    }

    #[test]
    fn applying_twice_equals_applying_once() {
        let table = sample();
        let sel = Selection::new(genres(&["Comedy", "Drama"]), YearRange::new(2000, 2001));
        let once = apply_selection(&table, &sel);
        let twice = apply_selection(&once, &sel);
        assert_eq!(once, twice);
    }

    #[test]
    fn full_selection_returns_the_table_unchanged() {
        let table = sample();
        let years = year_options(&table);
        let sel = Selection::new(
            genre_options(&table),
            YearRange::new(years[0], years[years.len() - 1]),
        );
        assert_eq!(apply_selection(&table, &sel), table);
    }

    #[test]
    fn defaults_intersect_editorial_genres_with_data() {
        let table = movies(&[("Комедия", 2005, 1.0), ("Мюзикл", 2005, 2.0)]);
        let sel = Selection::defaults(&table, &Settings::default());
        assert_eq!(sel.genres, genres(&["Комедия"]));
        assert_eq!((sel.years.lo(), sel.years.hi()), (2000, 2016));
    }

    #[test]
    fn year_bounds_fixed_unless_derived() {
        let table = sample();
        let fixed = year_bounds(&table, &Settings::default());
        assert_eq!((fixed.lo(), fixed.hi()), (1986, 2016));

        let settings = Settings {
            derive_year_bounds: true,
            ..Settings::default()
        };
        let derived = year_bounds(&table, &settings);
        assert_eq!((derived.lo(), derived.hi()), (1990, 2002));

        let sel = Selection::defaults(&table, &settings);
        assert_eq!((sel.years.lo(), sel.years.hi()), (2000, 2002));
    }
}
