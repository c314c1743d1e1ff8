use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a chosen column (usually the team) to
/// distinct colours so bars and legends stay consistent across charts.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<CellValue, Color32> = unique_values
            .iter()
            .zip(palette.into_iter())
            .map(|(v, c): (&CellValue, Color32)| (v.clone(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given cell value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (value label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c): (&CellValue, &Color32)| (v.to_string(), *c))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for correlation cells
// ---------------------------------------------------------------------------

/// Blue-white-red scale over [-1, 1]. Values outside the range clamp;
/// NaN renders as the neutral midpoint.
pub fn diverging_color(value: f64) -> Color32 {
    let v = if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    };
    let t = v.abs() as f32;
    let blend = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t) as u8;
    if v < 0.0 {
        // towards blue
        Color32::from_rgb(blend(255, 40), blend(255, 100), blend(255, 200))
    } else {
        // towards red
        Color32::from_rgb(blend(255, 200), blend(255, 60), blend(255, 50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colors() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        let unique: BTreeSet<_> = palette.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 8);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn color_map_is_stable_per_value() {
        let values: BTreeSet<CellValue> = [
            CellValue::Text("CA Cimarrón".into()),
            CellValue::Text("Deportivo Alba".into()),
        ]
        .into_iter()
        .collect();
        let map = ColorMap::new("equipo", &values);

        let a = map.color_for(&CellValue::Text("CA Cimarrón".into()));
        let b = map.color_for(&CellValue::Text("Deportivo Alba".into()));
        assert_ne!(a, b);
        assert_eq!(a, map.color_for(&CellValue::Text("CA Cimarrón".into())));
        assert_eq!(
            map.color_for(&CellValue::Text("desconocido".into())),
            Color32::GRAY
        );
        assert_eq!(map.legend_entries().len(), 2);
    }

    #[test]
    fn diverging_scale_endpoints() {
        assert_eq!(diverging_color(0.0), Color32::from_rgb(255, 255, 255));
        assert_eq!(diverging_color(1.0), Color32::from_rgb(200, 60, 50));
        assert_eq!(diverging_color(-1.0), Color32::from_rgb(40, 100, 200));
        // clamps and tolerates NaN
        assert_eq!(diverging_color(3.0), diverging_color(1.0));
        assert_eq!(diverging_color(f64::NAN), diverging_color(0.0));
    }
}
