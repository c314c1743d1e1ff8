use std::cmp::Ordering;

use crate::data::model::PlayerTable;
use crate::error::ScoutError;

use super::{find_player, peer_rows, require_numeric};

// ---------------------------------------------------------------------------
// Metric ranking
// ---------------------------------------------------------------------------

/// One ranked player.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub row: usize,
    pub player: String,
    pub team: String,
    pub position: String,
    pub minutes: Option<f64>,
    pub value: Option<f64>,
}

/// Top players by one metric, best first. Rows failing the minutes or
/// position constraints are excluded; null metric values sort last. An
/// empty result is valid and means nothing qualified.
pub fn rank_players(
    table: &PlayerTable,
    metric: &str,
    min_minutes: f64,
    position: Option<&str>,
    limit: usize,
) -> Result<Vec<RankEntry>, ScoutError> {
    require_numeric(table, metric)?;

    let mut indices = peer_rows(table, min_minutes, position);
    indices.sort_by(|&a, &b| {
        let va = table.rows[a].number(metric).filter(|v| !v.is_nan());
        let vb = table.rows[b].number(metric).filter(|v| !v.is_nan());
        match (va, vb) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    indices.truncate(limit);

    let entries = indices
        .into_iter()
        .map(|index| {
            let row = &table.rows[index];
            RankEntry {
                row: index,
                player: display_or_dash(table, index, "jugador"),
                team: display_or_dash(table, index, "equipo"),
                position: display_or_dash(table, index, "pos"),
                minutes: table
                    .identity_column("min")
                    .and_then(|col| row.number(col)),
                value: row.number(metric).filter(|v| !v.is_nan()),
            }
        })
        .collect();

    Ok(entries)
}

fn display_or_dash(table: &PlayerTable, index: usize, column: &str) -> String {
    let rendered = table
        .identity_column(column)
        .map(|col| table.rows[index].display(col))
        .unwrap_or_default();
    if rendered.is_empty() {
        "-".to_string()
    } else {
        rendered
    }
}

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

/// A player's standing on one metric within their peer group.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentileEntry {
    pub metric: String,
    pub value: f64,
    /// Share of peers at or below the player's value, in `[0, 100]`.
    pub percentile: f64,
}

/// Percentile of each metric within the peer group, sorted best first.
///
/// The peer group is every player over the minutes threshold in the
/// given position; with no explicit position, the player's own is used.
/// Metrics the player has no value for are skipped. Peers missing a
/// metric count against the percentile: they sit in the denominator but
/// can never be "at or below".
pub fn player_percentiles(
    table: &PlayerTable,
    player: &str,
    metrics: &[String],
    min_minutes: f64,
    position: Option<&str>,
) -> Result<Vec<PercentileEntry>, ScoutError> {
    let (_, row) = find_player(table, player)?;

    let position = match position {
        Some(p) => Some(p.to_string()),
        None => table
            .identity_column("pos")
            .map(|col| row.display(col))
            .filter(|p| !p.is_empty()),
    };

    let peers = peer_rows(table, min_minutes, position.as_deref());
    if peers.is_empty() {
        return Ok(Vec::new());
    }

    let mut entries: Vec<PercentileEntry> = metrics
        .iter()
        .filter(|metric| table.has_column(metric))
        .filter_map(|metric| {
            let value = row.number(metric).filter(|v| !v.is_nan())?;
            let at_or_below = peers
                .iter()
                .filter(|&&peer| {
                    table.rows[peer]
                        .number(metric)
                        .is_some_and(|v| v <= value)
                })
                .count();
            Some(PercentileEntry {
                metric: metric.clone(),
                value,
                percentile: at_or_below as f64 / peers.len() as f64 * 100.0,
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        b.percentile
            .partial_cmp(&a.percentile)
            .unwrap_or(Ordering::Equal)
    });
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testutil::roster;

    fn metrics(names: &[&str]) -> Vec<String> {
        names.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn ranks_best_first_with_limit() {
        let table = roster();
        let entries = rank_players(&table, "goles/90", 0.0, None, 3).unwrap();
        let players: Vec<&str> = entries.iter().map(|e| e.player.as_str()).collect();
        // Gael Mora has null minutes and never qualifies.
        assert_eq!(players, vec!["Nico Vega", "Mateo Luna", "Teo Cano"]);
        assert_eq!(entries[0].value, Some(0.70));
        assert_eq!(entries[0].team, "Deportivo Alba");
    }

    #[test]
    fn minutes_and_position_narrow_the_pool() {
        let table = roster();
        let entries = rank_players(&table, "goles/90", 500.0, Some("DEL"), 10).unwrap();
        let players: Vec<&str> = entries.iter().map(|e| e.player.as_str()).collect();
        assert_eq!(players, vec!["Mateo Luna", "Teo Cano"]);
    }

    #[test]
    fn empty_ranking_is_valid() {
        let table = roster();
        let entries = rank_players(&table, "goles/90", 9000.0, None, 10).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn text_metric_is_rejected() {
        let table = roster();
        let err = rank_players(&table, "equipo", 0.0, None, 10).unwrap_err();
        assert_eq!(err, ScoutError::InvalidMetric("equipo".into()));
    }

    #[test]
    fn percentiles_rank_within_position_peers() {
        let table = roster();
        // Luna's default peer group: DEL with minutes (Luna, Vega, Cano).
        let entries =
            player_percentiles(&table, "Mateo Luna", &metrics(&["goles/90"]), 0.0, None)
                .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, 0.61);
        // Luna (0.61) and Cano (0.33) at or below, Vega (0.70) above.
        assert!((entries[0].percentile - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn percentiles_sort_best_first() {
        let table = roster();
        let entries = player_percentiles(
            &table,
            "Nico Vega",
            &metrics(&["goles/90", "xg/90"]),
            0.0,
            None,
        )
        .unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].percentile >= entries[1].percentile);
        // Vega tops both metrics among DEL peers.
        assert!((entries[0].percentile - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_peer_group_yields_no_entries() {
        let table = roster();
        let entries = player_percentiles(
            &table,
            "Mateo Luna",
            &metrics(&["goles/90"]),
            0.0,
            Some("POR"),
        )
        .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn explicit_position_overrides_the_players_own() {
        let table = roster();
        let entries = player_percentiles(
            &table,
            "Mateo Luna",
            &metrics(&["goles/90"]),
            0.0,
            Some("MED"),
        )
        .unwrap();
        // Peer group is Ríos alone (Mora has null minutes); Luna's 0.61
        // beats Ríos's 0.17.
        assert_eq!(entries.len(), 1);
        assert!((entries[0].percentile - 100.0).abs() < 1e-9);
    }
}
