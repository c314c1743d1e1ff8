use std::io::Write;

use anyhow::{Context, Result};

use super::model::PlayerTable;

// ---------------------------------------------------------------------------
// Filtered-view CSV export
// ---------------------------------------------------------------------------

/// Write the given rows and columns as CSV, in view order. Cells render
/// exactly as the table shows them; null and missing cells are empty.
pub fn write_csv<W: Write>(
    table: &PlayerTable,
    columns: &[String],
    row_indices: &[usize],
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns).context("writing CSV header")?;

    for &index in row_indices {
        let Some(row) = table.rows.get(index) else {
            continue;
        };
        let record: Vec<String> = columns.iter().map(|c| row.display(c)).collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {index}"))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Timestamped default file name for an export.
pub fn export_file_name() -> String {
    format!(
        "jugadores_filtrados_{}.csv",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, PlayerRow};

    fn table() -> PlayerTable {
        let rows = vec![
            PlayerRow {
                cells: [
                    ("jugador".to_string(), CellValue::Text("Luna".into())),
                    ("min".to_string(), CellValue::Int(2430)),
                    ("xg/90".to_string(), CellValue::Float(0.31)),
                ]
                .into(),
            },
            PlayerRow {
                cells: [
                    ("jugador".to_string(), CellValue::Text("Ríos".into())),
                    ("min".to_string(), CellValue::Null),
                    ("xg/90".to_string(), CellValue::Float(0.12)),
                ]
                .into(),
            },
        ];
        PlayerTable::from_rows(rows, &[])
    }

    #[test]
    fn writes_selected_columns_for_visible_rows() {
        let table = table();
        let columns = vec!["jugador".to_string(), "min".to_string()];
        let mut out = Vec::new();
        write_csv(&table, &columns, &[1, 0], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "jugador,min\nRíos,\nLuna,2430\n");
    }

    #[test]
    fn missing_columns_render_empty() {
        let table = table();
        let columns = vec!["jugador".to_string(), "equipo".to_string()];
        let mut out = Vec::new();
        write_csv(&table, &columns, &[0], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "jugador,equipo\nLuna,\n");
    }

    #[test]
    fn export_name_is_timestamped() {
        let name = export_file_name();
        assert!(name.starts_with("jugadores_filtrados_"));
        assert!(name.ends_with(".csv"));
    }
}
