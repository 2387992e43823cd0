use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` colours with hues spread evenly around the wheel.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let rgb: Srgb = Hsl::new(i as f32 * step, 0.75, 0.55).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Genre → Color32
// ---------------------------------------------------------------------------

/// Assigns every genre of the loaded table a fixed colour, so a genre keeps
/// its line colour while the selection changes.
#[derive(Debug, Clone, Default)]
pub struct GenreColors {
    mapping: BTreeMap<String, Color32>,
}

impl GenreColors {
    pub fn new(genres: &BTreeSet<String>) -> Self {
        let mapping = genres
            .iter()
            .cloned()
            .zip(generate_palette(genres.len()))
            .collect();
        GenreColors { mapping }
    }

    pub fn color_for(&self, genre: &str) -> Color32 {
        self.mapping.get(genre).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colours() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 6);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_genre_is_grey() {
        let genres: BTreeSet<String> = ["Drama".to_string()].into_iter().collect();
        let colors = GenreColors::new(&genres);
        assert_ne!(colors.color_for("Drama"), Color32::GRAY);
        assert_eq!(colors.color_for("Western"), Color32::GRAY);
    }
}
