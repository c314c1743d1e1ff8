// ---------------------------------------------------------------------------
// Numeric display formats
// ---------------------------------------------------------------------------

/// Display precision of a numeric column. Decides the rendered decimals
/// and the drag step of its range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFormat {
    /// Whole numbers: counts, minutes, ages.
    Integer,
    /// One decimal: percentages and mild ratios.
    OneDecimal,
    /// Two decimals: per-90 rates and expected-goal style metrics.
    TwoDecimal,
}

impl NumericFormat {
    /// Step used by the range filter drag widgets.
    pub fn step(self) -> f64 {
        match self {
            NumericFormat::Integer => 1.0,
            NumericFormat::OneDecimal => 0.1,
            NumericFormat::TwoDecimal => 0.01,
        }
    }

    pub fn render(self, value: f64) -> String {
        match self {
            NumericFormat::Integer => format!("{value:.0}"),
            NumericFormat::OneDecimal => format!("{value:.1}"),
            NumericFormat::TwoDecimal => format!("{value:.2}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Name fragments of columns that count whole events.
const INTEGER_HINTS: &[&str] = &[
    "min", "pj", "gol", "asis", "ta", "tr", "remat", "edad", "alt", "peso",
    "interc", "entrada", "pase", "corner", "centro", "duelo", "falta", "tiro",
    "año", "anio", "salida", "parada", "toque",
];

/// Name fragments of rate metrics that need two decimals.
const PRECISE_HINTS: &[&str] = &["/90", "xa", "xg", "ratio", "prom", "media"];

/// Name fragments of percentage metrics.
const PERCENT_HINTS: &[&str] = &["pct", "%", "porc", "conv"];

/// How many non-null values the classifier inspects per column.
pub const SAMPLE_CAP: usize = 100;

/// Pick the display format of a numeric column from its lowercased name
/// and a sample of its values.
///
/// Observed decimals override name hints: a column named like a count
/// still gets two decimals when its values carry real fractional parts.
/// Name hints are checked integer → percent → precise; the value-based
/// fallback handles unhinted names.
pub fn classify(column: &str, sample: &[f64]) -> NumericFormat {
    let values: Vec<f64> = sample
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .take(SAMPLE_CAP)
        .collect();
    if values.is_empty() {
        return NumericFormat::Integer;
    }

    let has_decimals = values.iter().any(|v| v.fract() != 0.0);
    let non_trivial = values.iter().any(|v| (v - v.round()).abs() > 0.01);

    let name = column.to_lowercase();
    let has_hint = |hints: &[&str]| hints.iter().any(|h| name.contains(h));

    if has_hint(INTEGER_HINTS) && !non_trivial {
        return NumericFormat::Integer;
    }
    if has_hint(PERCENT_HINTS) {
        return if non_trivial {
            NumericFormat::OneDecimal
        } else {
            NumericFormat::Integer
        };
    }
    if has_hint(PRECISE_HINTS) || non_trivial {
        return NumericFormat::TwoDecimal;
    }
    if has_decimals {
        NumericFormat::OneDecimal
    } else {
        NumericFormat::Integer
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per90_rate_gets_two_decimals() {
        // "gol" is an integer hint, but observed decimals override it
        // and "/90" marks the column as a rate.
        let format = classify("goles/90", &[0.45, 0.62, 0.38]);
        assert_eq!(format, NumericFormat::TwoDecimal);
        assert_eq!(format.step(), 0.01);
    }

    #[test]
    fn age_stays_integer() {
        let format = classify("edad", &[23.0, 27.0, 31.0]);
        assert_eq!(format, NumericFormat::Integer);
        assert_eq!(format.step(), 1.0);
    }

    #[test]
    fn fractional_percentage_gets_one_decimal() {
        let format = classify("pases_pct", &[78.3, 81.9, 64.2]);
        assert_eq!(format, NumericFormat::OneDecimal);
        assert_eq!(format.step(), 0.1);
    }

    #[test]
    fn whole_percentage_stays_integer() {
        assert_eq!(classify("regates_pct", &[55.0, 61.0]), NumericFormat::Integer);
    }

    #[test]
    fn empty_sample_defaults_to_integer() {
        assert_eq!(classify("valor_tm", &[]), NumericFormat::Integer);
        assert_eq!(classify("xg/90", &[f64::NAN]), NumericFormat::Integer);
    }

    #[test]
    fn unhinted_names_fall_back_on_values() {
        // Near-integral decimals below the 0.01 tolerance count as trivial.
        assert_eq!(classify("indice", &[4.0, 5.001]), NumericFormat::OneDecimal);
        assert_eq!(classify("indice", &[4.0, 5.2]), NumericFormat::TwoDecimal);
        assert_eq!(classify("indice", &[4.0, 5.0]), NumericFormat::Integer);
    }

    #[test]
    fn rendering_follows_format() {
        assert_eq!(NumericFormat::Integer.render(23.0), "23");
        assert_eq!(NumericFormat::OneDecimal.render(78.34), "78.3");
        assert_eq!(NumericFormat::TwoDecimal.render(0.456), "0.46");
    }
}
