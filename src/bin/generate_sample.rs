use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

// ---------------------------------------------------------------------------
// Deterministic synthetic league
// ---------------------------------------------------------------------------

const SEASON_YEAR: i64 = 2025;
const SQUAD_SIZE: usize = 18;

const TEAMS: &[&str] = &[
    "CA Cimarrón",
    "Deportivo Alba",
    "Unión Sur",
    "Atlético Robledo",
    "CD Miraflores",
    "Racing Peñalba",
    "Real Valdeza",
    "SD Carbayón",
    "UD Estepona",
    "Gimnástica Arlanza",
];

const FIRST_NAMES: &[&str] = &[
    "Mateo", "Iker", "Bruno", "Nico", "Teo", "Gael", "Hugo", "Dani", "Pablo", "Marco", "Adrián",
    "Sergio", "Álvaro", "Diego", "Javi", "Luis", "Raúl", "Óscar", "Unai", "Aimar",
];

const LAST_NAMES: &[&str] = &[
    "Luna", "Ríos", "Soto", "Vega", "Cano", "Mora", "Navas", "Prieto", "Campos", "Rueda", "Salas",
    "Bravo", "Ferrer", "Ibáñez", "Quintana", "Arteaga", "Carbonell", "Duarte", "Escudero",
    "Fuentes",
];

const COUNTRIES: &[&str] = &[
    "Argentina", "Uruguay", "Colombia", "México", "Chile", "Portugal", "Francia", "Marruecos",
    "Ghana",
];

/// Output column order: the general block first, then attacking,
/// passing, defending and goalkeeping stats.
const COLUMNS: &[&str] = &[
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
    "goles",
    "goles/90",
    "xg",
    "xg/90",
    "remates/90",
    "remates_port_pct",
    "goles_conv_pct",
    "regates/90",
    "regates_pct",
    "toques_area_pen/90",
    "asis",
    "asis/90",
    "xa",
    "xa/90",
    "pases/90",
    "pases_pct",
    "pases_prog/90",
    "jugadas_claves/90",
    "pases_prof/90",
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
    "TR",
    "paradas_pct",
    "goles_rec/90",
    "goles_evit/90",
    "salidas/90",
    "duelos_aer_portero/90",
    "porterias_imbatidas",
];

#[derive(Clone, Debug)]
enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
}

/// One player, keyed by column name. Unset columns render as null.
struct Row(BTreeMap<&'static str, Cell>);

impl Row {
    fn new() -> Self {
        Row(BTreeMap::new())
    }

    fn set(&mut self, column: &'static str, cell: Cell) {
        self.0.insert(column, cell);
    }

    fn get(&self, column: &str) -> &Cell {
        self.0.get(column).unwrap_or(&Cell::Null)
    }
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Inclusive integer range.
    fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as i64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[(self.next_u64() % options.len() as u64) as usize]
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A per-90 rate: base plus a quality-scaled span plus noise, floored at 0.
fn rate(rng: &mut SimpleRng, q: f64, base: f64, span: f64) -> f64 {
    round2((base + span * q + rng.gauss(0.0, span * 0.12)).max(0.0))
}

/// A percentage: clamped to 0..100, one decimal.
fn pct(rng: &mut SimpleRng, q: f64, base: f64, span: f64) -> f64 {
    round1((base + span * q + rng.gauss(0.0, 3.0)).clamp(0.0, 100.0))
}

fn position(slot: usize) -> &'static str {
    match slot {
        0 | 1 => "POR",
        2..=7 => "DEF",
        8..=13 => "MED",
        _ => "DEL",
    }
}

fn secondary(pos: &str, rng: &mut SimpleRng) -> &'static str {
    match pos {
        "DEF" => "MED",
        "MED" => {
            if rng.chance(0.5) {
                "DEF"
            } else {
                "DEL"
            }
        }
        _ => "MED",
    }
}

// ---------------------------------------------------------------------------
// Player generation
// ---------------------------------------------------------------------------

fn generate_player(index: usize, team: &str, slot: usize, q: f64, rng: &mut SimpleRng) -> Row {
    let pos = position(slot);
    let name = format!(
        "{} {}",
        FIRST_NAMES[index % FIRST_NAMES.len()],
        LAST_NAMES[(index / FIRST_NAMES.len()) % LAST_NAMES.len()]
    );

    let mut row = Row::new();
    row.set("jugador", Cell::Text(name));
    row.set("equipo", Cell::Text(team.to_string()));
    row.set("pos", Cell::Text(pos.to_string()));
    if pos != "POR" && rng.chance(0.35) {
        row.set("pos_secun", Cell::Text(secondary(pos, rng).to_string()));
    }

    let anio = rng.range_i64(1986, 2006);
    let edad = SEASON_YEAR - anio;
    row.set("anio_nac", Cell::Int(anio));
    row.set("edad", Cell::Int(edad));

    let pais = if rng.chance(0.55) {
        "España"
    } else {
        rng.pick(COUNTRIES)
    };
    row.set("pais_nat", Cell::Text(pais.to_string()));
    // A share of foreigners hold an EU passport as well.
    let pasap = if pais != "España" && rng.chance(0.25) {
        "España"
    } else {
        pais
    };
    row.set("pasap", Cell::Text(pasap.to_string()));

    let alt = match pos {
        "POR" => rng.range_i64(185, 199),
        "DEF" => rng.range_i64(178, 194),
        "MED" => rng.range_i64(168, 186),
        _ => rng.range_i64(172, 191),
    };
    row.set("alt_cm", Cell::Int(alt));
    row.set("peso_kg", Cell::Int(alt - 100 + rng.range_i64(-6, 6)));

    let pie = if rng.chance(0.65) {
        "derecho"
    } else if rng.chance(0.8) {
        "izquierdo"
    } else {
        "ambidiestro"
    };
    row.set("pie", Cell::Text(pie.to_string()));
    row.set(
        "fin_contrato",
        Cell::Text(format!("{}-06-30", rng.range_i64(2025, 2029))),
    );
    row.set("prestamo", Cell::Bool(rng.chance(0.12)));

    // Market value peaks around age 25 and grows with quality.
    let age_factor = (1.0 - (edad as f64 - 25.0).abs() / 20.0).clamp(0.2, 1.0);
    let value = (0.15 + 19.85 * q * q * age_factor) * 1_000_000.0;
    row.set(
        "valor_tm",
        Cell::Int(((value / 50_000.0).round() as i64) * 50_000),
    );

    // Playing time. A few players have no recorded minutes.
    let pj = rng.range_i64(4, 36);
    row.set("pj", Cell::Int(pj));
    let minutes = if index % 53 == 0 {
        None
    } else {
        Some(pj * rng.range_i64(55, 90))
    };
    if let Some(min) = minutes {
        row.set("min", Cell::Int(min));
    }
    let min_f = minutes.unwrap_or(0) as f64;

    if pos == "POR" {
        goalkeeper_stats(&mut row, q, pj, rng);
    } else {
        outfield_stats(&mut row, pos, q, min_f, rng);
    }
    row
}

fn outfield_stats(row: &mut Row, pos: &str, q: f64, minutes: f64, rng: &mut SimpleRng) {
    // ---- Attack ----
    let (goles_base, goles_span) = match pos {
        "DEL" => (0.18, 0.55),
        "MED" => (0.04, 0.22),
        _ => (0.01, 0.08),
    };
    let goles_90 = rate(rng, q, goles_base, goles_span);
    let xg_90 = round2((goles_90 + rng.gauss(0.0, 0.07)).max(0.0));
    row.set("goles/90", Cell::Float(goles_90));
    row.set("xg/90", Cell::Float(xg_90));
    row.set("goles", Cell::Int((goles_90 * minutes / 90.0).round() as i64));
    row.set("xg", Cell::Float(round2(xg_90 * minutes / 90.0)));

    let (rem_base, rem_span) = match pos {
        "DEL" => (1.8, 2.4),
        "MED" => (0.8, 1.6),
        _ => (0.3, 0.7),
    };
    row.set("remates/90", Cell::Float(rate(rng, q, rem_base, rem_span)));
    row.set("remates_port_pct", Cell::Float(pct(rng, q, 28.0, 18.0)));
    row.set("goles_conv_pct", Cell::Float(pct(rng, q, 8.0, 14.0)));

    let (reg_base, reg_span) = match pos {
        "DEL" => (1.2, 3.5),
        "MED" => (0.8, 2.2),
        _ => (0.2, 0.9),
    };
    row.set("regates/90", Cell::Float(rate(rng, q, reg_base, reg_span)));
    row.set("regates_pct", Cell::Float(pct(rng, q, 45.0, 15.0)));
    let (toq_base, toq_span) = match pos {
        "DEL" => (1.8, 3.5),
        "MED" => (0.8, 1.8),
        _ => (0.2, 0.8),
    };
    row.set(
        "toques_area_pen/90",
        Cell::Float(rate(rng, q, toq_base, toq_span)),
    );

    // ---- Passing ----
    let (asis_base, asis_span) = match pos {
        "DEL" => (0.08, 0.25),
        "MED" => (0.08, 0.30),
        _ => (0.02, 0.10),
    };
    let asis_90 = rate(rng, q, asis_base, asis_span);
    let xa_90 = round2((asis_90 + rng.gauss(0.0, 0.05)).max(0.0));
    row.set("asis/90", Cell::Float(asis_90));
    row.set("xa/90", Cell::Float(xa_90));
    row.set("asis", Cell::Int((asis_90 * minutes / 90.0).round() as i64));
    row.set("xa", Cell::Float(round2(xa_90 * minutes / 90.0)));

    let (pases_base, pases_span, pct_base) = match pos {
        "DEF" => (38.0, 18.0, 76.0),
        "MED" => (42.0, 26.0, 80.0),
        _ => (18.0, 14.0, 68.0),
    };
    row.set("pases/90", Cell::Float(rate(rng, q, pases_base, pases_span)));
    row.set("pases_pct", Cell::Float(pct(rng, q, pct_base, 12.0)));
    let (prog_base, prog_span) = match pos {
        "MED" => (5.0, 6.0),
        "DEF" => (3.5, 4.0),
        _ => (1.0, 2.0),
    };
    row.set(
        "pases_prog/90",
        Cell::Float(rate(rng, q, prog_base, prog_span)),
    );
    let (clav_base, clav_span) = match pos {
        "DEL" => (0.6, 1.5),
        "MED" => (0.5, 1.6),
        _ => (0.1, 0.5),
    };
    row.set(
        "jugadas_claves/90",
        Cell::Float(rate(rng, q, clav_base, clav_span)),
    );
    let (prof_base, prof_span) = match pos {
        "MED" => (1.0, 3.0),
        "DEL" => (0.6, 2.0),
        _ => (0.4, 1.5),
    };
    row.set(
        "pases_prof/90",
        Cell::Float(rate(rng, q, prof_base, prof_span)),
    );

    // ---- Defence ----
    row.set("duelos/90", Cell::Float(rate(rng, q, 7.0, 6.0)));
    row.set("duelos_w_pct", Cell::Float(pct(rng, q, 38.0, 18.0)));
    let (def_base, def_span) = match pos {
        "DEF" => (5.5, 4.0),
        "MED" => (3.5, 3.0),
        _ => (1.2, 1.8),
    };
    row.set(
        "duelos_def/90",
        Cell::Float(rate(rng, q, def_base, def_span)),
    );
    let def_w_base = if pos == "DEF" { 55.0 } else { 48.0 };
    row.set("duelos_def_w_pct", Cell::Float(pct(rng, q, def_w_base, 16.0)));
    let (aer_base, aer_span) = match pos {
        "DEF" => (3.0, 3.5),
        "MED" => (1.0, 1.8),
        _ => (1.5, 2.5),
    };
    row.set(
        "duelos_aer/90",
        Cell::Float(rate(rng, q, aer_base, aer_span)),
    );
    let aer_w_base = if pos == "DEF" { 48.0 } else { 35.0 };
    row.set("duelos_aer_w_pct", Cell::Float(pct(rng, q, aer_w_base, 20.0)));
    let (ent_base, ent_span) = match pos {
        "DEF" => (1.4, 1.6),
        "MED" => (0.9, 1.2),
        _ => (0.3, 0.7),
    };
    row.set("entradas/90", Cell::Float(rate(rng, q, ent_base, ent_span)));
    let (int_base, int_span) = match pos {
        "DEF" => (4.5, 3.5),
        "MED" => (3.0, 2.5),
        _ => (1.0, 1.2),
    };
    row.set("interc/90", Cell::Float(rate(rng, q, int_base, int_span)));
    row.set("faltas/90", Cell::Float(rate(rng, 1.0 - q, 0.7, 1.2)));
    row.set("TA", Cell::Int(rng.range_i64(0, (minutes / 300.0) as i64 + 1)));
    row.set("TR", Cell::Int(if rng.chance(0.08) { 1 } else { 0 }));
}

fn goalkeeper_stats(row: &mut Row, q: f64, pj: i64, rng: &mut SimpleRng) {
    row.set("paradas_pct", Cell::Float(pct(rng, q, 62.0, 14.0)));
    row.set(
        "goles_rec/90",
        Cell::Float(round2((1.75 - 0.9 * q + rng.gauss(0.0, 0.12)).max(0.3))),
    );
    // Post-shot goals prevented can legitimately go negative.
    row.set(
        "goles_evit/90",
        Cell::Float(round2(-0.25 + 0.75 * q + rng.gauss(0.0, 0.06))),
    );
    row.set("salidas/90", Cell::Float(rate(rng, q, 0.6, 1.4)));
    row.set(
        "duelos_aer_portero/90",
        Cell::Float(rate(rng, q, 0.2, 1.1)),
    );
    row.set(
        "porterias_imbatidas",
        Cell::Int((pj as f64 * (0.15 + 0.3 * q)).round() as i64),
    );

    // Keepers still play the ball with their feet.
    row.set("pases/90", Cell::Float(rate(rng, q, 22.0, 10.0)));
    row.set("pases_pct", Cell::Float(pct(rng, q, 68.0, 22.0)));
    row.set("pases_prog/90", Cell::Float(rate(rng, q, 1.0, 2.0)));
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn csv_value(cell: &Cell) -> String {
    match cell {
        Cell::Int(i) => i.to_string(),
        Cell::Float(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Bool(b) => b.to_string(),
        Cell::Null => String::new(),
    }
}

fn write_csv(path: &str, rows: &[Row]) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(COLUMNS)
        .expect("Failed to write CSV header");
    for row in rows {
        let record: Vec<String> = COLUMNS.iter().map(|c| csv_value(row.get(c))).collect();
        writer.write_record(&record).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

/// Arrow representation of one output column: text wins over float,
/// float over int, so mixed columns degrade gracefully.
fn column_array(cells: &[&Cell]) -> (DataType, ArrayRef) {
    let has_text = cells.iter().any(|c| matches!(c, Cell::Text(_)));
    let has_float = cells.iter().any(|c| matches!(c, Cell::Float(_)));
    let has_int = cells.iter().any(|c| matches!(c, Cell::Int(_)));
    let has_bool = cells.iter().any(|c| matches!(c, Cell::Bool(_)));

    if has_text {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Cell::Null => None,
                other => Some(csv_value(other)),
            })
            .collect();
        (DataType::Utf8, Arc::new(StringArray::from(values)) as ArrayRef)
    } else if has_float {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Float(v) => Some(*v),
                Cell::Int(i) => Some(*i as f64),
                _ => None,
            })
            .collect();
        (DataType::Float64, Arc::new(Float64Array::from(values)))
    } else if has_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        (DataType::Int64, Arc::new(Int64Array::from(values)))
    } else if has_bool {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Cell::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        (DataType::Boolean, Arc::new(BooleanArray::from(values)))
    } else {
        (
            DataType::Utf8,
            Arc::new(StringArray::from(vec![None::<String>; cells.len()])),
        )
    }
}

fn write_parquet(path: &str, rows: &[Row]) {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();
    for column in COLUMNS {
        let cells: Vec<&Cell> = rows.iter().map(|r| r.get(column)).collect();
        let (data_type, array) = column_array(&cells);
        fields.push(Field::new(*column, data_type, true));
        arrays.push(array);
    }
    let schema = Arc::new(Schema::new(fields));

    let batch =
        RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");
    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let mut rows: Vec<Row> = Vec::new();
    let mut index = 0;
    for (t, team) in TEAMS.iter().enumerate() {
        // Earlier teams are slightly stronger, so rankings have texture.
        let team_factor = 1.0 - t as f64 / TEAMS.len() as f64;
        for slot in 0..SQUAD_SIZE {
            let q = (0.65 * rng.next_f64() + 0.35 * team_factor).clamp(0.02, 0.98);
            rows.push(generate_player(index, team, slot, q, &mut rng));
            index += 1;
        }
    }

    std::fs::create_dir_all("data").expect("Failed to create data directory");
    write_csv("data/jugadores.csv", &rows);
    write_parquet("data/jugadores.parquet", &rows);

    println!(
        "Wrote {} players ({} columns) to data/jugadores.csv and data/jugadores.parquet",
        rows.len(),
        COLUMNS.len()
    );
}
