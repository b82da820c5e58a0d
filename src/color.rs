use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.55).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// County → Color32
// ---------------------------------------------------------------------------

/// Stable colour per county, so a county keeps its colour in the pie and the
/// bar chart regardless of what else is selected.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Assign colours to `counties` in the given order.
    pub fn new(counties: &[String]) -> Self {
        let mapping = counties
            .iter()
            .cloned()
            .zip(generate_palette(counties.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, county: &str) -> Color32 {
        self.mapping
            .get(county)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        assert_ne!(colors[0], colors[3]);
    }

    #[test]
    fn unknown_county_gets_default() {
        let counties = vec!["Napa".to_string(), "Butte".to_string()];
        let map = ColorMap::new(&counties);
        assert_ne!(map.color_for("Napa"), map.color_for("Butte"));
        assert_eq!(map.color_for("Atlantis"), Color32::GRAY);
    }
}
