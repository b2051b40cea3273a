use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue step between consecutive colours, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_76;

/// `n` distinct colours. Hues advance by the golden angle, so the first `k`
/// colours are the same whatever `n` is.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.55 } else { 0.45 };
            let rgb: Srgb = Hsl::new(hue, 0.7, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct group labels of the dataset to distinct colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(palette).collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label; unknown labels are grey.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn palette_prefix_is_stable() {
        assert_eq!(generate_palette(3), generate_palette(7)[..3].to_vec());
    }

    #[test]
    fn unknown_labels_are_grey() {
        let labels: BTreeSet<CellValue> = ["Benin", "Togo"].into_iter().map(CellValue::from).collect();
        let map = ColorMap::new(&labels);
        assert_ne!(map.color_for(&"Benin".into()), map.color_for(&"Togo".into()));
        assert_eq!(map.color_for(&"Niger".into()), Color32::GRAY);
    }
}
