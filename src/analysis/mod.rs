/// Analysis layer: chart-ready numbers derived from the loaded table.
///
/// Every function here is pure: it reads a [`PlayerTable`] and returns
/// plain data for the visualization panels to draw. Errors are typed
/// ([`ScoutError`]) so the panels can show a message instead of a chart.

pub mod compare;
pub mod correlation;
pub mod radar;
pub mod ranking;

use crate::data::model::{ColumnType, PlayerRow, PlayerTable};
use crate::error::ScoutError;

/// Locate a player by exact display name.
pub fn find_player<'a>(
    table: &'a PlayerTable,
    name: &str,
) -> Result<(usize, &'a PlayerRow), ScoutError> {
    let column = table
        .identity_column("jugador")
        .ok_or_else(|| ScoutError::MissingColumn("jugador".into()))?
        .to_string();
    table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.display(&column) == name)
        .ok_or_else(|| ScoutError::PlayerNotFound(name.to_string()))
}

pub(crate) fn require_numeric(table: &PlayerTable, metric: &str) -> Result<(), ScoutError> {
    match table.column_type(metric) {
        Some(ColumnType::Numeric) => Ok(()),
        _ => Err(ScoutError::InvalidMetric(metric.to_string())),
    }
}

/// Row indices of a comparison peer group: players with at least
/// `min_minutes` played, optionally restricted to one position.
///
/// Rows with a null minutes cell never qualify; a dataset without a
/// minutes or position column simply skips that constraint.
pub(crate) fn peer_rows(
    table: &PlayerTable,
    min_minutes: f64,
    position: Option<&str>,
) -> Vec<usize> {
    let minutes_col = table.identity_column("min").map(str::to_string);
    let position_col = table.identity_column("pos").map(str::to_string);

    (0..table.len())
        .filter(|&index| {
            let row = &table.rows[index];
            if let Some(col) = &minutes_col {
                if !row.number(col).is_some_and(|m| m >= min_minutes) {
                    return false;
                }
            }
            if let (Some(col), Some(position)) = (&position_col, position) {
                if row.display(col) != position {
                    return false;
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::data::model::{CellValue, PlayerRow, PlayerTable};

    pub fn row(pairs: &[(&str, CellValue)]) -> PlayerRow {
        PlayerRow {
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    pub fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    /// Six-player roster spanning two teams and three positions.
    pub fn roster() -> PlayerTable {
        let players: &[(&str, &str, &str, Option<i64>, f64, f64)] = &[
            ("Mateo Luna", "CA Cimarrón", "DEL", Some(2430), 0.61, 0.55),
            ("Iker Ríos", "Deportivo Alba", "MED", Some(1180), 0.17, 0.31),
            ("Bruno Soto", "CA Cimarrón", "DEF", Some(2700), 0.05, 0.04),
            ("Nico Vega", "Deportivo Alba", "DEL", Some(460), 0.70, 0.66),
            ("Teo Cano", "CA Cimarrón", "DEL", Some(1890), 0.33, 0.29),
            ("Gael Mora", "Deportivo Alba", "MED", None, 0.21, 0.18),
        ];
        let rows = players
            .iter()
            .map(|(name, team, pos, minutes, goles, xg)| {
                let min_cell = minutes.map(CellValue::Int).unwrap_or(CellValue::Null);
                row(&[
                    ("jugador", text(name)),
                    ("equipo", text(team)),
                    ("pos", text(pos)),
                    ("min", min_cell),
                    ("goles/90", CellValue::Float(*goles)),
                    ("xg/90", CellValue::Float(*xg)),
                ])
            })
            .collect();
        PlayerTable::from_rows(rows, &[])
    }
}
