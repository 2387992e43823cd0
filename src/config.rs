use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "BOX_OFFICE_CONFIG";

/// Editorial genre preselection, matching the labels of the sample dataset.
pub const DEFAULT_GENRES: [&str; 6] = [
    "Боевик",
    "Приключения",
    "Военные",
    "Комедия",
    "Драма",
    "Хоррор",
];

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Inclusive bounds of the year sliders.
    pub year_bounds: (i64, i64),
    /// Initially selected year range.
    pub default_years: (i64, i64),
    /// Genres preselected when present in the data.
    pub default_genres: Vec<String>,
    /// Use the data's own min/max year as slider bounds instead of `year_bounds`.
    pub derive_year_bounds: bool,
    /// Rows shown in the head preview.
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            year_bounds: (1986, 2016),
            default_years: (2000, 2016),
            default_genres: DEFAULT_GENRES.iter().map(|g| g.to_string()).collect(),
            derive_year_bounds: false,
            preview_rows: 5,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))
    }

    /// Settings from `$BOX_OFFICE_CONFIG`, or the defaults.
    ///
    /// A broken settings file is logged and ignored so the viewer still starts.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(settings) => {
                log::info!("Using settings from {}", Path::new(&path).display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings: {e:#}");
                Self::default()
            }
        }
    }
}
