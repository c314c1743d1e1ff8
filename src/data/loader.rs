use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::error::ScoutError;

use super::model::{CellValue, PlayerRow, PlayerTable};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one scouting export. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat Parquet file, one row per player (recommended)
/// * `.csv`     – header row with column names, one row per player
/// * `.json`    – `[{ "jugador": "...", "equipo": "...", ...stats }, ...]`
///
/// Every export must carry `jugador` and `equipo` columns (matched
/// case-insensitively) and at least one row.
pub fn load_file(path: &Path) -> Result<PlayerTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    validate(&table, &path.display().to_string())?;
    Ok(table)
}

/// Scouting exports in a directory (csv, parquet, json), sorted by name.
pub fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))?
    {
        let path = entry.context("reading directory entry")?.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if matches!(ext.as_str(), "csv" | "parquet" | "pq" | "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Concatenate several exports into one table, dropping duplicate
/// players. The first (jugador, equipo) occurrence wins, so earlier
/// files take precedence.
pub fn combine(tables: Vec<PlayerTable>) -> Result<PlayerTable> {
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for table in tables {
        for column in &table.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        rows.extend(table.rows);
    }

    let merged = PlayerTable::from_rows(rows, &columns);
    let identity = match (
        merged.identity_column("jugador").map(str::to_string),
        merged.identity_column("equipo").map(str::to_string),
    ) {
        (Some(player), Some(team)) => Some((player, team)),
        _ => None,
    };
    let rows = match identity {
        Some((player, team)) => dedup_players(merged.rows, &player, &team),
        None => merged.rows,
    };

    if rows.is_empty() {
        return Err(ScoutError::EmptyDataset("combined exports".into()).into());
    }
    Ok(PlayerTable::from_rows(rows, &columns))
}

fn dedup_players(rows: Vec<PlayerRow>, player_col: &str, team_col: &str) -> Vec<PlayerRow> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let key = match (row.cells.get(player_col), row.cells.get(team_col)) {
            (Some(player), Some(team)) if !player.is_null() && !team.is_null() => {
                Some((player.to_string(), team.to_string()))
            }
            _ => None,
        };
        match key {
            Some(key) => {
                if seen.insert(key) {
                    out.push(row);
                }
            }
            // Rows without a full identity are kept as-is.
            None => out.push(row),
        }
    }
    out
}

fn validate(table: &PlayerTable, source: &str) -> Result<()> {
    if table.is_empty() {
        return Err(ScoutError::EmptyDataset(source.to_string()).into());
    }
    for required in ["jugador", "equipo"] {
        if table.identity_column(required).is_none() {
            return Err(ScoutError::MissingColumn(required.to_string()).into());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Dataset cache
// ---------------------------------------------------------------------------

/// Default time-to-live of memoized loads (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Memoizes [`load_file`] per canonical path. Purely a latency shortcut:
/// entries expire after the TTL, and `invalidate` drops everything so a
/// manual reload always rereads from disk.
pub struct DatasetCache {
    ttl: Duration,
    entries: BTreeMap<PathBuf, (Instant, PlayerTable)>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        DatasetCache {
            ttl,
            entries: BTreeMap::new(),
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<PlayerTable> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if let Some((stamp, table)) = self.entries.get(&key) {
            if stamp.elapsed() < self.ttl {
                return Ok(table.clone());
            }
        }
        let table = load_file(path)?;
        self.entries.insert(key, (Instant::now(), table.clone()));
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        DatasetCache::new(DEFAULT_TTL)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<PlayerTable> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv(file)
}

fn read_csv<R: Read>(input: R) -> Result<PlayerTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut cells = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(column) = headers.get(col_idx) else {
                continue;
            };
            cells.insert(column.clone(), guess_cell_type(value.trim()));
        }
        rows.push(PlayerRow { cells });
    }

    Ok(PlayerTable::from_rows(rows, &headers))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "jugador": "Mateo Luna", "equipo": "CA Cimarrón", "min": 2430, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<PlayerTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<PlayerTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let mut cells = BTreeMap::new();
        for (key, val) in obj {
            cells.insert(key.clone(), json_to_cell(val));
        }
        rows.push(PlayerRow { cells });
    }

    Ok(PlayerTable::from_rows(rows, &[]))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet file, one row per player.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); stat columns may be strings, ints,
/// floats or bools.
fn load_parquet(path: &Path) -> Result<PlayerTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    let mut columns: Vec<String> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        if columns.is_empty() {
            columns = schema.fields().iter().map(|f| f.name().clone()).collect();
        }

        for row in 0..batch.num_rows() {
            let mut cells = BTreeMap::new();
            for (col_idx, field) in schema.fields().iter().enumerate() {
                let value = extract_cell(batch.column(col_idx), row);
                cells.insert(field.name().clone(), value);
            }
            rows.push(PlayerRow { cells });
        }
    }

    Ok(PlayerTable::from_rows(rows, &columns))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::Text(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::Text(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Int(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Int(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        // Dates, decimals and other exotic dtypes degrade to their
        // rendered text.
        _ => array_value_to_string(col, row)
            .map(CellValue::Text)
            .unwrap_or(CellValue::Null),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ojeador_{tag}_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    const ROSTER_CSV: &str = "\
jugador,equipo,pos,min,goles/90,prestamo
Mateo Luna,CA Cimarrón,DEL,2430,0.61,false
Iker Ríos,Deportivo Alba,MED,1180,0.17,true
Bruno Soto,CA Cimarrón,DEF,,0.05,false
";

    #[test]
    fn cell_guessing_prefers_narrowest_type() {
        assert_eq!(guess_cell_type(""), CellValue::Null);
        assert_eq!(guess_cell_type("42"), CellValue::Int(42));
        assert_eq!(guess_cell_type("0.61"), CellValue::Float(0.61));
        assert_eq!(guess_cell_type("true"), CellValue::Bool(true));
        assert_eq!(guess_cell_type("DEL"), CellValue::Text("DEL".into()));
    }

    #[test]
    fn csv_preserves_header_order_and_empty_cells() {
        let table = read_csv(ROSTER_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.columns,
            vec!["jugador", "equipo", "pos", "min", "goles/90", "prestamo"]
        );
        assert_eq!(table.value(2, "min"), Some(&CellValue::Null));
        assert_eq!(table.value(0, "min"), Some(&CellValue::Int(2430)));
    }

    #[test]
    fn json_records_load_with_mixed_types() {
        let table = parse_json(
            r#"[
                {"jugador": "Luna", "equipo": "CAC", "min": 2430, "xg/90": 0.31},
                {"jugador": "Ríos", "equipo": "ALB", "min": null, "prestamo": true}
            ]"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "min"), Some(&CellValue::Int(2430)));
        assert_eq!(table.value(1, "min"), Some(&CellValue::Null));
        assert_eq!(table.value(1, "prestamo"), Some(&CellValue::Bool(true)));
        assert!(table.value(0, "prestamo").is_none());
    }

    #[test]
    fn parquet_round_trip() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("jugador", DataType::Utf8, false),
            Field::new("equipo", DataType::Utf8, false),
            Field::new("min", DataType::Int64, true),
            Field::new("xg/90", DataType::Float64, true),
            Field::new("prestamo", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Luna", "Ríos"])),
                Arc::new(StringArray::from(vec!["CAC", "ALB"])),
                Arc::new(Int64Array::from(vec![Some(2430), None])),
                Arc::new(Float64Array::from(vec![0.31, 0.12])),
                Arc::new(BooleanArray::from(vec![false, true])),
            ],
        )
        .unwrap();

        let dir = temp_dir("parquet");
        let path = dir.join("roster.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns,
            vec!["jugador", "equipo", "min", "xg/90", "prestamo"]
        );
        assert_eq!(table.value(1, "min"), Some(&CellValue::Null));
        assert_eq!(table.value(0, "xg/90"), Some(&CellValue::Float(0.31)));
        assert_eq!(table.value(1, "prestamo"), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn missing_identity_column_is_rejected() {
        let table = read_csv("nombre,min\nLuna,900\n".as_bytes()).unwrap();
        let err = validate(&table, "test.csv").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScoutError>(),
            Some(&ScoutError::MissingColumn("jugador".into()))
        );
    }

    #[test]
    fn empty_export_is_rejected() {
        let table = read_csv("jugador,equipo\n".as_bytes()).unwrap();
        let err = validate(&table, "test.csv").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScoutError>(),
            Some(&ScoutError::EmptyDataset("test.csv".into()))
        );
    }

    #[test]
    fn combine_drops_duplicate_players() {
        let first = read_csv(ROSTER_CSV.as_bytes()).unwrap();
        let second = read_csv(
            "jugador,equipo,valor_tm\nMateo Luna,CA Cimarrón,8000000\nNico Vega,Unión Sur,1500000\n"
                .as_bytes(),
        )
        .unwrap();

        let combined = combine(vec![first, second]).unwrap();
        // Mateo Luna appears in both exports; the first one wins.
        assert_eq!(combined.len(), 4);
        assert_eq!(combined.value(0, "valor_tm"), None);
        let last = combined.len() - 1;
        assert_eq!(
            combined.value(last, "jugador"),
            Some(&CellValue::Text("Nico Vega".into()))
        );
        // Union of columns, first-file order first.
        assert!(combined.columns.starts_with(&[
            "jugador".to_string(),
            "equipo".to_string(),
            "pos".to_string()
        ]));
        assert!(combined.columns.contains(&"valor_tm".to_string()));
    }

    #[test]
    fn cache_returns_same_table_and_invalidates() {
        let dir = temp_dir("cache");
        let path = dir.join("roster.csv");
        std::fs::write(&path, ROSTER_CSV).unwrap();

        let mut cache = DatasetCache::new(Duration::from_secs(60));
        let first = cache.load(&path).unwrap();
        // Rewrite the file; the cache should still serve the old copy.
        std::fs::write(&path, "jugador,equipo\nOtro,Club\n").unwrap();
        let second = cache.load(&path).unwrap();
        assert_eq!(first, second);

        cache.invalidate();
        let third = cache.load(&path).unwrap();
        assert_eq!(third.len(), 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn data_files_are_listed_sorted() {
        let dir = temp_dir("listing");
        std::fs::write(dir.join("b.csv"), "x").unwrap();
        std::fs::write(dir.join("a.parquet"), "x").unwrap();
        std::fs::write(dir.join("notas.txt"), "x").unwrap();

        let files = list_data_files(&dir).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.parquet", "b.csv"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn unknown_extension_is_an_error() {
        assert!(load_file(Path::new("jugadores.xlsx")).is_err());
    }
}
