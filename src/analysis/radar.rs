use crate::data::model::PlayerTable;
use crate::error::ScoutError;

use super::find_player;

// ---------------------------------------------------------------------------
// Radar chart data
// ---------------------------------------------------------------------------

/// One radar spoke: the metric, the player's raw value, and the value
/// min-max scaled against the whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarAxis {
    pub metric: String,
    pub raw: Option<f64>,
    /// In `[0, 1]`; 0.5 when the column has no spread.
    pub normalized: f64,
}

/// Normalized radar axes for one player.
///
/// Metrics missing from the dataset are skipped. Normalization is
/// against the full column, not the filtered view, so radars stay
/// comparable across filter sessions. A null or non-numeric player
/// value scales as zero.
pub fn radar_data(
    table: &PlayerTable,
    player: &str,
    metrics: &[String],
) -> Result<Vec<RadarAxis>, ScoutError> {
    let (_, row) = find_player(table, player)?;

    let available: Vec<&String> = metrics.iter().filter(|m| table.has_column(m)).collect();
    if available.is_empty() {
        return Err(ScoutError::InsufficientMetrics { needed: 1, got: 0 });
    }

    let axes = available
        .into_iter()
        .map(|metric| {
            let raw = row.number(metric).filter(|v| !v.is_nan());
            let value = raw.unwrap_or(0.0);
            let normalized = match table.numeric_extent(metric) {
                Some((min, max)) if max > min => ((value - min) / (max - min)).clamp(0.0, 1.0),
                _ => 0.5,
            };
            RadarAxis {
                metric: metric.clone(),
                raw,
                normalized,
            }
        })
        .collect();

    Ok(axes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::{roster, row, text};
    use crate::data::model::{CellValue, PlayerTable};

    fn metrics(names: &[&str]) -> Vec<String> {
        names.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn normalizes_against_the_full_column() {
        let table = roster();
        let axes = radar_data(&table, "Mateo Luna", &metrics(&["goles/90", "xg/90"])).unwrap();
        assert_eq!(axes.len(), 2);

        // goles/90 spans 0.05..0.70; Luna sits at 0.61.
        let goles = &axes[0];
        assert_eq!(goles.metric, "goles/90");
        assert_eq!(goles.raw, Some(0.61));
        assert!((goles.normalized - (0.61 - 0.05) / 0.65).abs() < 1e-9);

        // Best in the column normalizes to exactly 1.
        let best = radar_data(&table, "Nico Vega", &metrics(&["goles/90"])).unwrap();
        assert!((best[0].normalized - 1.0).abs() < 1e-9);
    }

    #[test]
    fn absent_metrics_are_skipped() {
        let table = roster();
        let axes =
            radar_data(&table, "Iker Ríos", &metrics(&["goles/90", "regates/90"])).unwrap();
        assert_eq!(axes.len(), 1);
        assert_eq!(axes[0].metric, "goles/90");
    }

    #[test]
    fn no_usable_metric_is_an_error() {
        let table = roster();
        let err = radar_data(&table, "Iker Ríos", &metrics(&["regates/90"])).unwrap_err();
        assert_eq!(err, ScoutError::InsufficientMetrics { needed: 1, got: 0 });
    }

    #[test]
    fn unknown_player_is_an_error() {
        let table = roster();
        let err = radar_data(&table, "Nadie", &metrics(&["goles/90"])).unwrap_err();
        assert_eq!(err, ScoutError::PlayerNotFound("Nadie".into()));
    }

    #[test]
    fn null_value_scales_as_zero_and_clamps() {
        let rows = vec![
            row(&[
                ("jugador", text("Uno")),
                ("toques/90", CellValue::Float(40.0)),
            ]),
            row(&[
                ("jugador", text("Dos")),
                ("toques/90", CellValue::Float(80.0)),
            ]),
            row(&[("jugador", text("Tres")), ("toques/90", CellValue::Null)]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        let axes = radar_data(&table, "Tres", &metrics(&["toques/90"])).unwrap();
        assert_eq!(axes[0].raw, None);
        // Raw 0 sits below the 40..80 extent and clamps to 0.
        assert_eq!(axes[0].normalized, 0.0);
    }

    #[test]
    fn constant_column_normalizes_to_half() {
        let rows = vec![
            row(&[("jugador", text("Uno")), ("pj", CellValue::Int(30))]),
            row(&[("jugador", text("Dos")), ("pj", CellValue::Int(30))]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        let axes = radar_data(&table, "Uno", &metrics(&["pj"])).unwrap();
        assert_eq!(axes[0].normalized, 0.5);
    }
}
