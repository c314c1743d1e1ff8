use crate::data::model::{ColumnType, PlayerTable};
use crate::error::ScoutError;

use super::peer_rows;

// ---------------------------------------------------------------------------
// Metric correlation
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix over a metric group.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub metrics: Vec<String>,
    /// `values[i][j]` is the correlation of `metrics[i]` with
    /// `metrics[j]`; NaN when fewer than two complete pairs exist or a
    /// column has no variance.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i][j]
    }
}

/// Pairwise Pearson correlations over the peer group. Each pair uses
/// the rows where both metrics are present, so one sparse column does
/// not blank the whole matrix.
pub fn correlation_matrix(
    table: &PlayerTable,
    metrics: &[String],
    min_minutes: f64,
    position: Option<&str>,
) -> Result<CorrelationMatrix, ScoutError> {
    let numeric: Vec<String> = metrics
        .iter()
        .filter(|m| table.column_type(m) == Some(ColumnType::Numeric))
        .cloned()
        .collect();
    if numeric.len() < 2 {
        return Err(ScoutError::InsufficientMetrics {
            needed: 2,
            got: numeric.len(),
        });
    }

    let peers = peer_rows(table, min_minutes, position);

    let n = numeric.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let pairs: Vec<(f64, f64)> = peers
                .iter()
                .filter_map(|&row| {
                    let a = table.rows[row].number(&numeric[i])?;
                    let b = table.rows[row].number(&numeric[j])?;
                    (!a.is_nan() && !b.is_nan()).then_some((a, b))
                })
                .collect();
            let r = pearson(&pairs);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        metrics: numeric,
        values,
    })
}

/// Pearson correlation coefficient; NaN for fewer than two pairs or a
/// zero-variance side.
fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / nf;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (a, b) in pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a == 0.0 || var_b == 0.0 {
        return f64::NAN;
    }
    cov / (var_a.sqrt() * var_b.sqrt())
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
    fn perfectly_correlated_metrics_score_one() {
        let rows: Vec<_> = (0..10)
            .map(|i| {
                row(&[
                    ("jugador", text(&format!("J{i}"))),
                    ("min", CellValue::Int(900)),
                    ("a", CellValue::Float(i as f64)),
                    ("b", CellValue::Float(2.0 * i as f64 + 5.0)),
                    ("c", CellValue::Float(-(i as f64))),
                ])
            })
            .collect();
        let table = PlayerTable::from_rows(rows, &[]);
        let matrix = correlation_matrix(&table, &metrics(&["a", "b", "c"]), 0.0, None).unwrap();

        assert_eq!(matrix.metrics, vec!["a", "b", "c"]);
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-9);
        assert!((matrix.get(0, 2) + 1.0).abs() < 1e-9);
        assert_eq!(matrix.get(1, 1), 1.0);
        assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
    }

    #[test]
    fn fewer_than_two_numeric_metrics_is_an_error() {
        let table = roster();
        let err =
            correlation_matrix(&table, &metrics(&["goles/90", "equipo"]), 0.0, None).unwrap_err();
        assert_eq!(err, ScoutError::InsufficientMetrics { needed: 2, got: 1 });
    }

    #[test]
    fn sparse_columns_use_pairwise_complete_rows() {
        let rows = vec![
            row(&[
                ("jugador", text("Uno")),
                ("min", CellValue::Int(900)),
                ("a", CellValue::Float(1.0)),
                ("b", CellValue::Float(2.0)),
            ]),
            row(&[
                ("jugador", text("Dos")),
                ("min", CellValue::Int(900)),
                ("a", CellValue::Float(2.0)),
                ("b", CellValue::Null),
            ]),
            row(&[
                ("jugador", text("Tres")),
                ("min", CellValue::Int(900)),
                ("a", CellValue::Float(3.0)),
                ("b", CellValue::Float(6.0)),
            ]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        let matrix = correlation_matrix(&table, &metrics(&["a", "b"]), 0.0, None).unwrap();
        // Two complete pairs remain, enough for a coefficient.
        assert!((matrix.get(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_column_has_no_correlation() {
        let rows: Vec<_> = (0..5)
            .map(|i| {
                row(&[
                    ("jugador", text(&format!("J{i}"))),
                    ("min", CellValue::Int(900)),
                    ("a", CellValue::Float(i as f64)),
                    ("b", CellValue::Float(7.0)),
                ])
            })
            .collect();
        let table = PlayerTable::from_rows(rows, &[]);
        let matrix = correlation_matrix(&table, &metrics(&["a", "b"]), 0.0, None).unwrap();
        assert!(matrix.get(0, 1).is_nan());
        assert_eq!(matrix.get(0, 0), 1.0);
    }

    #[test]
    fn peer_constraints_drive_the_sample() {
        let table = roster();
        let matrix = correlation_matrix(
            &table,
            &metrics(&["goles/90", "xg/90"]),
            500.0,
            Some("DEL"),
        )
        .unwrap();
        // Luna and Cano only: two pairs, strongly positive.
        assert!(matrix.get(0, 1) > 0.99);
    }
}
