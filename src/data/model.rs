use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the player table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Scouting exports mix types freely
/// (market values as text, minutes as integers, per-90 rates as floats),
/// so every cell carries its own tag. `Null` marks a stat the provider
/// did not report for that player.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Int(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for filtering and charts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – coarse dtype of a column
// ---------------------------------------------------------------------------

/// Coarse type of a column, derived from its non-null cells. Drives
/// which filter widget the column gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Int cells, Float cells, or a mix of both.
    Numeric,
    Text,
    Boolean,
}

// ---------------------------------------------------------------------------
// PlayerRow – one row of the dataset
// ---------------------------------------------------------------------------

/// A single player (one row of the source export).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerRow {
    /// Dynamic columns: column_name → value.
    pub cells: BTreeMap<String, CellValue>,
}

impl PlayerRow {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Numeric value of a cell, if present and numeric.
    pub fn number(&self, column: &str) -> Option<f64> {
        self.cells.get(column).and_then(CellValue::as_f64)
    }

    /// Cell rendered for display; missing and null cells are empty.
    pub fn display(&self, column: &str) -> String {
        self.cells
            .get(column)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// PlayerTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column summaries. The filter
/// schema and the charts read the summaries instead of rescanning rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTable {
    /// All players (rows).
    pub rows: Vec<PlayerRow>,
    /// Column names in source order (CSV header order, Parquet schema
    /// order); columns found only in the rows are appended sorted.
    pub columns: Vec<String>,
    /// For each column its coarse dtype.
    pub column_types: BTreeMap<String, ColumnType>,
    /// For each column the sorted set of unique non-null values.
    pub distinct_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl PlayerTable {
    /// Build column summaries from loaded rows. `column_order` fixes the
    /// leading column order.
    pub fn from_rows(rows: Vec<PlayerRow>, column_order: &[String]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for name in column_order {
            if !columns.contains(name) {
                columns.push(name.clone());
            }
        }
        let mut extras: BTreeSet<String> = BTreeSet::new();
        for row in &rows {
            for name in row.cells.keys() {
                if !columns.contains(name) {
                    extras.insert(name.clone());
                }
            }
        }
        columns.extend(extras);

        let mut column_types = BTreeMap::new();
        let mut distinct_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();
        for name in &columns {
            let mut has_text = false;
            let mut has_number = false;
            let mut has_bool = false;
            let mut distinct = BTreeSet::new();
            for row in &rows {
                let Some(value) = row.cells.get(name) else { continue };
                match value {
                    CellValue::Text(_) => has_text = true,
                    CellValue::Int(_) | CellValue::Float(_) => has_number = true,
                    CellValue::Bool(_) => has_bool = true,
                    CellValue::Null => continue,
                }
                distinct.insert(value.clone());
            }
            // Mixed columns degrade to text, the most permissive view.
            let column_type = if has_text || (has_number && has_bool) {
                ColumnType::Text
            } else if has_bool {
                ColumnType::Boolean
            } else if has_number {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            };
            column_types.insert(name.clone(), column_type);
            distinct_values.insert(name.clone(), distinct);
        }

        PlayerTable {
            rows,
            columns,
            column_types,
            distinct_values,
        }
    }

    /// Number of players.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_types.contains_key(column)
    }

    pub fn column_type(&self, column: &str) -> Option<ColumnType> {
        self.column_types.get(column).copied()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }

    pub fn distinct(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        self.distinct_values.get(column)
    }

    pub fn distinct_count(&self, column: &str) -> usize {
        self.distinct_values.get(column).map_or(0, BTreeSet::len)
    }

    /// Observed numeric min and max of a column, skipping nulls and NaNs.
    pub fn numeric_extent(&self, column: &str) -> Option<(f64, f64)> {
        let mut extent: Option<(f64, f64)> = None;
        for row in &self.rows {
            let Some(v) = row.number(column) else { continue };
            if v.is_nan() {
                continue;
            }
            extent = Some(match extent {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        extent
    }

    /// Up to `cap` non-null numeric values of a column, in row order.
    pub fn numeric_sample(&self, column: &str, cap: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.number(column))
            .take(cap)
            .collect()
    }

    /// Resolve a well-known column (jugador, equipo, pos, min) by
    /// case-insensitive name, returning its actual spelling.
    pub fn identity_column(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> PlayerRow {
        PlayerRow {
            cells: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn cell_ordering_is_total() {
        let mut values = vec![
            CellValue::Text("a".into()),
            CellValue::Float(1.5),
            CellValue::Null,
            CellValue::Int(3),
            CellValue::Bool(true),
            CellValue::Float(f64::NAN),
        ];
        values.sort();
        assert_eq!(values[0], CellValue::Null);
        assert!(matches!(values.last(), Some(CellValue::Text(_))));
    }

    #[test]
    fn null_displays_empty() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
    }

    #[test]
    fn column_types_from_cells() {
        let rows = vec![
            row(&[
                ("jugador", CellValue::Text("Luna".into())),
                ("min", CellValue::Int(900)),
                ("xg/90", CellValue::Float(0.31)),
                ("prestamo", CellValue::Bool(false)),
            ]),
            row(&[
                ("jugador", CellValue::Text("Ríos".into())),
                ("min", CellValue::Float(1210.0)),
                ("xg/90", CellValue::Null),
                ("prestamo", CellValue::Bool(true)),
            ]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        assert_eq!(table.column_type("jugador"), Some(ColumnType::Text));
        assert_eq!(table.column_type("min"), Some(ColumnType::Numeric));
        assert_eq!(table.column_type("xg/90"), Some(ColumnType::Numeric));
        assert_eq!(table.column_type("prestamo"), Some(ColumnType::Boolean));
    }

    #[test]
    fn all_null_column_is_text() {
        let rows = vec![row(&[("notas", CellValue::Null)])];
        let table = PlayerTable::from_rows(rows, &[]);
        assert_eq!(table.column_type("notas"), Some(ColumnType::Text));
        assert_eq!(table.distinct_count("notas"), 0);
    }

    #[test]
    fn column_order_follows_source_then_extras() {
        let order = vec!["jugador".to_string(), "equipo".to_string()];
        let rows = vec![row(&[
            ("equipo", CellValue::Text("CAC".into())),
            ("jugador", CellValue::Text("Soto".into())),
            ("edad", CellValue::Int(23)),
        ])];
        let table = PlayerTable::from_rows(rows, &order);
        assert_eq!(table.columns, vec!["jugador", "equipo", "edad"]);
    }

    #[test]
    fn numeric_extent_skips_nulls() {
        let rows = vec![
            row(&[("min", CellValue::Int(200))]),
            row(&[("min", CellValue::Null)]),
            row(&[("min", CellValue::Float(1800.0))]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        assert_eq!(table.numeric_extent("min"), Some((200.0, 1800.0)));
        assert_eq!(table.numeric_extent("edad"), None);
    }

    #[test]
    fn distinct_values_ignore_nulls() {
        let rows = vec![
            row(&[("pos", CellValue::Text("DEL".into()))]),
            row(&[("pos", CellValue::Text("DEF".into()))]),
            row(&[("pos", CellValue::Null)]),
            row(&[("pos", CellValue::Text("DEL".into()))]),
        ];
        let table = PlayerTable::from_rows(rows, &[]);
        assert_eq!(table.distinct_count("pos"), 2);
    }

    #[test]
    fn identity_column_is_case_insensitive() {
        let rows = vec![row(&[("Jugador", CellValue::Text("Luna".into()))])];
        let table = PlayerTable::from_rows(rows, &[]);
        assert_eq!(table.identity_column("jugador"), Some("Jugador"));
        assert_eq!(table.identity_column("equipo"), None);
    }
}
