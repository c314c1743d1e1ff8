use crate::data::model::{CellValue, PlayerTable};
use crate::error::ScoutError;

use super::find_player;

// ---------------------------------------------------------------------------
// Side-by-side comparison
// ---------------------------------------------------------------------------

/// Pre-formatted comparison grid: one row per found player, one column
/// per available metric after the leading name column.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build the comparison grid for the requested players.
///
/// Players missing from the dataset are dropped silently; it is an error
/// only when none are found. Metrics missing from the dataset are
/// dropped from the columns.
pub fn comparison_table(
    table: &PlayerTable,
    players: &[String],
    metrics: &[String],
) -> Result<ComparisonTable, ScoutError> {
    let available: Vec<&String> = metrics.iter().filter(|m| table.has_column(m)).collect();

    let mut rows = Vec::new();
    for player in players {
        let Ok((_, row)) = find_player(table, player) else {
            continue;
        };
        let mut cells = vec![player.clone()];
        for metric in &available {
            cells.push(format_stat(metric, row.get(metric)));
        }
        rows.push(cells);
    }

    if rows.is_empty() {
        return Err(ScoutError::PlayerNotFound(players.join(", ")));
    }

    let mut columns = vec!["jugador".to_string()];
    columns.extend(available.into_iter().cloned());
    Ok(ComparisonTable { columns, rows })
}

/// Render one stat for the comparison grid. Numeric precision follows
/// the metric name: percentages get one decimal and a sign, per-90 and
/// expected-goal rates get two decimals, counts get none. Null cells
/// render as a dash.
pub fn format_stat(metric: &str, cell: Option<&CellValue>) -> String {
    let Some(cell) = cell else {
        return "-".to_string();
    };
    if cell.is_null() {
        return "-".to_string();
    }
    let Some(value) = cell.as_f64() else {
        return cell.to_string();
    };
    if value.is_nan() {
        return "-".to_string();
    }

    let name = metric.to_lowercase();
    if name.contains("pct") || name.contains('%') {
        format!("{value:.1}%")
    } else if ["/90", "ratio", "xa", "xg"].iter().any(|h| name.contains(h)) {
        format!("{value:.2}")
    } else {
        format!("{value:.0}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::roster;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn grid_has_one_row_per_found_player() {
        let table = roster();
        let grid = comparison_table(
            &table,
            &names(&["Mateo Luna", "Desconocido", "Iker Ríos"]),
            &names(&["goles/90", "regates/90", "min"]),
        )
        .unwrap();

        assert_eq!(grid.columns, vec!["jugador", "goles/90", "min"]);
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.rows[0], vec!["Mateo Luna", "0.61", "2430"]);
        assert_eq!(grid.rows[1], vec!["Iker Ríos", "0.17", "1180"]);
    }

    #[test]
    fn no_player_found_is_an_error() {
        let table = roster();
        let err = comparison_table(&table, &names(&["Nadie", "Tampoco"]), &names(&["min"]))
            .unwrap_err();
        assert_eq!(err, ScoutError::PlayerNotFound("Nadie, Tampoco".into()));
    }

    #[test]
    fn stat_formatting_follows_metric_names() {
        assert_eq!(format_stat("pases_pct", Some(&CellValue::Float(78.346))), "78.3%");
        assert_eq!(format_stat("xg/90", Some(&CellValue::Float(0.456))), "0.46");
        assert_eq!(format_stat("xa", Some(&CellValue::Float(3.149))), "3.15");
        assert_eq!(format_stat("goles", Some(&CellValue::Int(14))), "14");
        assert_eq!(format_stat("min", Some(&CellValue::Null)), "-");
        assert_eq!(format_stat("min", None), "-");
        assert_eq!(
            format_stat("pie", Some(&CellValue::Text("Izquierdo".into()))),
            "Izquierdo"
        );
    }
}
