use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dashboard group configuration
// ---------------------------------------------------------------------------

/// A named, ordered list of dataset columns shown and filtered together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub label: String,
    pub columns: Vec<String>,
}

impl ColumnGroup {
    fn new(label: &str, columns: &[&str]) -> Self {
        ColumnGroup {
            label: label.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Hand-authored dashboard layout: the column groups of the database view
/// and the metric groups offered by the charts. Never inferred from data.
/// A JSON file next to the binary may replace the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub column_groups: Vec<ColumnGroup>,
    pub metric_groups: Vec<ColumnGroup>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfig {
            column_groups: default_column_groups(),
            metric_groups: default_metric_groups(),
        }
    }
}

impl GroupConfig {
    /// Read a configuration from a JSON file, falling back to the built-in
    /// groups when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(GroupConfig::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading group config {}", path.display()))?;
        GroupConfig::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing group config JSON")
    }

    pub fn metric_group(&self, label: &str) -> Option<&ColumnGroup> {
        self.metric_groups.iter().find(|g| g.label == label)
    }
}

fn default_column_groups() -> Vec<ColumnGroup> {
    vec![
        ColumnGroup::new(
            "GENERAL",
            &[
                "jugador",
                "equipo",
                "pos",
                "pos_secun",
                "pj",
                "min",
                "anio_nac",
                "edad",
                "pais_nat",
                "pasap",
                "valor_tm",
                "fin_contrato",
                "prestamo",
                "alt_cm",
                "peso_kg",
                "pie",
            ],
        ),
        ColumnGroup::new(
            "FASE DEFENSIVA",
            &[
                "duelos/90",
                "duelos_w_pct",
                "duelos_def/90",
                "duelos_def_w_pct",
                "duelos_aer/90",
                "duelos_aer_w_pct",
                "entradas/90",
                "interc/90",
                "faltas/90",
                "TA",
                "TA/90",
                "TR",
                "TR/90",
            ],
        ),
        ColumnGroup::new(
            "FASE OFENSIVA",
            &[
                "goles",
                "goles/90",
                "xg",
                "xg/90",
                "remates",
                "remates/90",
                "remates_port_pct",
                "goles_conv_pct",
                "regates/90",
                "regates_pct",
                "duelos_of/90",
                "duelos_of_w_pct",
                "toques_area_pen/90",
                "carreras_prog/90",
                "acel/90",
            ],
        ),
        ColumnGroup::new(
            "ORGANIZACIÓN",
            &[
                "asis",
                "asis/90",
                "xa",
                "xa/90",
                "pases/90",
                "pases_pct",
                "pases_ade/90",
                "pases_ade_pct",
                "pases_larg/90",
                "pases_larg_pct",
                "pases_prog/90",
                "pases_prog_pct",
            ],
        ),
        ColumnGroup::new(
            "PASES CLAVES",
            &[
                "jugadas_claves/90",
                "asis_disparo/90",
                "pases_ult_terc/90",
                "pases_ult_terc_pct",
                "pases_area_pen/90",
                "pases_area_pen_pct",
                "pases_prof/90",
                "pases_prof_pct",
                "centros/90",
                "centros_pct",
            ],
        ),
        ColumnGroup::new(
            "PORTERO",
            &[
                "goles_recibidos",
                "goles_rec/90",
                "remates_contra",
                "remates_contra/90",
                "porterias_imbatidas",
                "paradas_pct",
                "goles_evit",
                "goles_evit/90",
                "pases_rec_portero/90",
                "salidas/90",
                "duelos_aer_portero/90",
            ],
        ),
        ColumnGroup::new(
            "BALÓN PARADO",
            &[
                "corners/90",
                "tiros_libres/90",
                "tiros_libres_dir/90",
                "tiros_libres_dir_pct",
                "penaltis_a_favor",
                "penaltis_conv_pct",
            ],
        ),
    ]
}

fn default_metric_groups() -> Vec<ColumnGroup> {
    vec![
        ColumnGroup::new(
            "ATAQUE",
            &[
                "goles/90",
                "xg/90",
                "remates/90",
                "remates_port_pct",
                "regates/90",
                "regates_pct",
                "toques_area_pen/90",
            ],
        ),
        ColumnGroup::new(
            "PASES",
            &[
                "pases/90",
                "pases_pct",
                "pases_prog/90",
                "jugadas_claves/90",
                "asis/90",
                "xa/90",
                "pases_prof/90",
            ],
        ),
        ColumnGroup::new(
            "DEFENSA",
            &[
                "duelos_def/90",
                "duelos_def_w_pct",
                "duelos_aer/90",
                "duelos_aer_w_pct",
                "entradas/90",
                "interc/90",
            ],
        ),
        ColumnGroup::new(
            "PORTERO",
            &[
                "paradas_pct",
                "goles_evit/90",
                "salidas/90",
                "duelos_aer_portero/90",
            ],
        ),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
