use std::path::Path;

use crate::color::GenreColors;
use crate::config::Settings;
use crate::data::editor::{merge, EditBuffer, MergeError, MergeSummary};
use crate::data::filter::{apply_selection, genre_options, year_bounds, Selection, YearRange};
use crate::data::loader::{self, FileFormat, LoadError};
use crate::data::model::Table;
use crate::data::pivot::{aggregate, pivot, AggregationCell, PivotTable};
use crate::stats::{describe, Description};

// ---------------------------------------------------------------------------
// Session – the canonical table of one upload
// ---------------------------------------------------------------------------

/// The working dataset. Created on a successful load, replaced wholesale by the
/// next upload; only [`Session::apply_edit`] changes it in place.
#[derive(Debug, Clone)]
pub struct Session {
    file_name: String,
    format: FileFormat,
    table: Table,
}

impl Session {
    pub fn open_path(path: &Path) -> Result<Self, LoadError> {
        let table = loader::load_file(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::with_table(&file_name, table))
    }

    fn with_table(file_name: &str, table: Table) -> Self {
        let format = FileFormat::from_file_name(file_name).unwrap_or(FileFormat::Csv);
        Session {
            file_name: file_name.to_string(),
            format,
            table,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Merge an edited copy into the canonical table.
    ///
    /// The table is replaced only when the merge succeeds; on error the previous
    /// table stays exactly as it was.
    pub fn apply_edit(&mut self, edited: &Table) -> Result<MergeSummary, MergeError> {
        match merge(&self.table, edited) {
            Ok(outcome) => {
                log::info!(
                    "Saved edits to {}: {} updated, {} added, {} removed",
                    self.file_name,
                    outcome.summary.updated,
                    outcome.summary.appended,
                    outcome.summary.removed
                );
                self.table = outcome.table;
                Ok(outcome.summary)
            }
            Err(e) => {
                log::warn!("Rejected edits to {}: {e}", self.file_name);
                Err(e)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which view the central panel shows. One per user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chart,
    Describe,
    Edit,
}

/// Aggregated view of the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Year × genre sums; one plot line per genre.
    pub pivot: PivotTable,
    /// The same sums in long form, for the data listing under the plot.
    pub cells: Vec<AggregationCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Loaded dataset (None until the user opens a file).
    pub session: Option<Session>,

    /// Current genre / year selection.
    pub selection: Selection,

    /// Chart data for the current selection (cached).
    pub chart: Option<Chart>,

    /// Line colour per genre of the loaded table.
    pub colors: GenreColors,

    pub view: View,

    /// Report for the describe view; computed when the view is opened.
    pub description: Option<Description>,

    /// Grid behind the edit view; seeded when the view is opened.
    pub edit_buffer: Option<EditBuffer>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let selection = Selection::new(Default::default(), YearRange::from(settings.default_years));
        Self {
            settings,
            session: None,
            selection,
            chart: None,
            colors: GenreColors::default(),
            view: View::default(),
            description: None,
            edit_buffer: None,
            status: None,
        }
    }

    /// Ingest a newly loaded session, reset the selection and views.
    pub fn set_session(&mut self, session: Session) {
        self.selection = Selection::defaults(session.table(), &self.settings);
        self.colors = GenreColors::new(&genre_options(session.table()));
        self.status = Some(Status::Info(format!(
            "Loaded {} ({}): {} rows",
            session.file_name(),
            session.format(),
            session.table().len()
        )));
        self.session = Some(session);
        self.view = View::Chart;
        self.description = None;
        self.edit_buffer = None;
        self.refresh_chart();
    }

    /// Load a file from disk. On failure the previous session is dropped and
    /// the error is shown so the user can pick another file.
    pub fn open_path(&mut self, path: &Path) {
        match Session::open_path(path) {
            Ok(session) => self.set_session(session),
            Err(e) => {
                let e = anyhow::Error::new(e);
                log::warn!("Failed to open {}: {e:#}", path.display());
                self.session = None;
                self.chart = None;
                self.description = None;
                self.edit_buffer = None;
                self.status = Some(Status::Error(format!("{e:#}. Please upload another file.")));
            }
        }
    }

    /// Slider domain for the current table.
    pub fn year_bounds(&self) -> YearRange {
        match &self.session {
            Some(s) => year_bounds(s.table(), &self.settings),
            None => YearRange::from(self.settings.year_bounds),
        }
    }

    /// Recompute the chart after a selection or data change.
    pub fn refresh_chart(&mut self) {
        self.chart = self.session.as_ref().map(|s| {
            let selected = apply_selection(s.table(), &self.selection);
            Chart {
                pivot: pivot(&selected),
                cells: aggregate(&selected),
            }
        });
    }

    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.selection.genres.remove(genre) {
            self.selection.genres.insert(genre.to_string());
        }
        self.refresh_chart();
    }

    pub fn select_all_genres(&mut self) {
        if let Some(s) = &self.session {
            self.selection.genres = genre_options(s.table());
        }
        self.refresh_chart();
    }

    pub fn select_no_genres(&mut self) {
        self.selection.genres.clear();
        self.refresh_chart();
    }

    pub fn set_years(&mut self, lo: i64, hi: i64) {
        self.selection.years = YearRange::new(lo, hi).clamp_to(self.year_bounds());
        self.refresh_chart();
    }

    pub fn show(&mut self, view: View) {
        if view == View::Edit && self.view != View::Edit {
            self.edit_buffer = self.session.as_ref().map(|s| EditBuffer::from_table(s.table()));
        }
        if view == View::Describe {
            self.description = self.session.as_ref().map(|s| describe(s.table()));
        }
        self.view = view;
    }

    /// Parse the edit grid and merge it into the session.
    pub fn save_edits(&mut self) {
        let (Some(session), Some(buffer)) = (self.session.as_mut(), self.edit_buffer.as_ref())
        else {
            return;
        };
        let result = buffer
            .to_table(session.table().schema())
            .and_then(|edited| session.apply_edit(&edited));

        match result {
            Ok(summary) => {
                self.status = Some(Status::Success(format!(
                    "Changes saved: {} updated, {} added, {} removed.",
                    summary.updated, summary.appended, summary.removed
                )));
                self.edit_buffer = Some(EditBuffer::from_table(session.table()));
                self.colors = GenreColors::new(&genre_options(session.table()));
                self.selection.years = self.selection.years.clamp_to(self.year_bounds());
                self.refresh_chart();
            }
            Err(e) => {
                self.status = Some(Status::Error(format!("Changes not saved: {e}")));
            }
        }
    }
}
