use std::collections::BTreeSet;

use super::format::{self, NumericFormat};
use super::model::{CellValue, ColumnType, PlayerTable};

// ---------------------------------------------------------------------------
// Filter descriptors: which widget each column gets
// ---------------------------------------------------------------------------

/// MultiSelect cutoff: text columns with more distinct values than this
/// get a search box instead of a checkbox list.
pub const MULTISELECT_MAX_OPTIONS: usize = 50;

/// The widget class of a single column filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterKind {
    /// Inclusive numeric interval with drag step and display format.
    Range {
        min: f64,
        max: f64,
        step: f64,
        format: NumericFormat,
    },
    /// Checkbox list over the column's distinct values, pre-rendered
    /// for display.
    MultiSelect { options: Vec<String> },
    /// Case-insensitive substring search.
    Text,
    /// "Only true" switch for boolean columns.
    Toggle,
}

/// One column's filter: the column name plus its widget class.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterDescriptor {
    pub column: String,
    pub kind: FilterKind,
}

/// The complete inferred schema: per configured group, a descriptor for
/// every group column present in the dataset, in group order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSchema {
    pub groups: Vec<(String, Vec<FilterDescriptor>)>,
}

impl FilterSchema {
    /// Derive the schema for a dataset. Group columns missing from the
    /// dataset are skipped; dataset columns outside every group are not
    /// filterable.
    pub fn build(table: &PlayerTable, groups: &[crate::config::ColumnGroup]) -> Self {
        let schema_groups = groups
            .iter()
            .map(|group| {
                let descriptors = group
                    .columns
                    .iter()
                    .filter(|column| table.has_column(column))
                    .map(|column| FilterDescriptor {
                        column: column.clone(),
                        kind: kind_for(table, column),
                    })
                    .collect();
                (group.label.clone(), descriptors)
            })
            .collect();
        FilterSchema {
            groups: schema_groups,
        }
    }

    /// First descriptor for a column, scanning groups in order.
    pub fn descriptor(&self, column: &str) -> Option<&FilterDescriptor> {
        self.groups
            .iter()
            .flat_map(|(_, descriptors)| descriptors.iter())
            .find(|d| d.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.groups
            .iter()
            .flat_map(|(_, descriptors)| descriptors.iter())
    }
}

/// Columns that keep a fixed widget regardless of what the data says.
/// Matched case-insensitively; later inference never overrides these.
const TEXT_OVERRIDES: &[&str] = &["jugador"];
const MULTISELECT_OVERRIDES: &[&str] = &["equipo", "pos", "pie"];

fn kind_for(table: &PlayerTable, column: &str) -> FilterKind {
    if TEXT_OVERRIDES.iter().any(|c| column.eq_ignore_ascii_case(c)) {
        return FilterKind::Text;
    }
    if MULTISELECT_OVERRIDES
        .iter()
        .any(|c| column.eq_ignore_ascii_case(c))
    {
        return FilterKind::MultiSelect {
            options: multiselect_options(table, column),
        };
    }

    match table.column_type(column) {
        Some(ColumnType::Numeric) => {
            let (min, max) = table.numeric_extent(column).unwrap_or((0.0, 100.0));
            let sample = table.numeric_sample(column, format::SAMPLE_CAP);
            let format = format::classify(column, &sample);
            // Integer columns get whole-number bounds.
            let (min, max) = match format {
                NumericFormat::Integer => (min.floor(), max.ceil()),
                _ => (min, max),
            };
            FilterKind::Range {
                min,
                max,
                step: format.step(),
                format,
            }
        }
        Some(ColumnType::Text) if table.distinct_count(column) <= MULTISELECT_MAX_OPTIONS => {
            FilterKind::MultiSelect {
                options: multiselect_options(table, column),
            }
        }
        Some(ColumnType::Text) => FilterKind::Text,
        Some(ColumnType::Boolean) => FilterKind::Toggle,
        None => FilterKind::Text,
    }
}

/// Distinct values rendered for display, in sorted order.
fn multiselect_options(table: &PlayerTable, column: &str) -> Vec<String> {
    table
        .distinct(column)
        .map(|values| values.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Active filters: the session's constraint set
// ---------------------------------------------------------------------------

/// The user-set constraint of one active filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Inclusive bounds of a range filter.
    Range { lo: f64, hi: f64 },
    /// Chosen options of a multiselect; empty means no constraint.
    Selected(BTreeSet<String>),
    /// Needle of a substring search; empty means no constraint.
    Needle(String),
    /// Toggle state; false means no constraint.
    On(bool),
}

impl FilterValue {
    /// Neutral starting value when a filter is first activated. Range
    /// filters start at the full observed interval, so activation alone
    /// hides nothing but null rows.
    pub fn default_for(kind: &FilterKind) -> Self {
        match kind {
            FilterKind::Range { min, max, .. } => FilterValue::Range { lo: *min, hi: *max },
            FilterKind::MultiSelect { .. } => FilterValue::Selected(BTreeSet::new()),
            FilterKind::Text => FilterValue::Needle(String::new()),
            FilterKind::Toggle => FilterValue::On(false),
        }
    }
}

/// Filters the user has switched on, in activation order. Starts empty;
/// grows and shrinks only through [`activate`](Self::activate),
/// [`deactivate`](Self::deactivate) and [`clear`](Self::clear).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveFilterSet {
    entries: Vec<(String, FilterValue)>,
}

impl ActiveFilterSet {
    pub fn new() -> Self {
        ActiveFilterSet::default()
    }

    /// Switch a filter on with its neutral value. Re-activating keeps
    /// the existing value.
    pub fn activate(&mut self, descriptor: &FilterDescriptor) {
        if !self.is_active(&descriptor.column) {
            self.entries.push((
                descriptor.column.clone(),
                FilterValue::default_for(&descriptor.kind),
            ));
        }
    }

    pub fn deactivate(&mut self, column: &str) {
        self.entries.retain(|(name, _)| name != column);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_active(&self, column: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == column)
    }

    pub fn value(&self, column: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn value_mut(&mut self, column: &str) -> Option<&mut FilterValue> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return indices of rows that pass every active filter.
///
/// A row passes a column filter when:
/// * The filtered column is absent from the dataset → passes (skipped)
/// * Range: the cell is numeric and inside the inclusive bounds; null
///   and non-numeric cells fail
/// * MultiSelect: nothing selected → passes; otherwise the cell's
///   display string is among the selected options
/// * Text: empty needle → passes; otherwise case-insensitive substring
///   match, null cells fail
/// * Toggle: off → passes; on → only `true` cells pass
pub fn apply(table: &PlayerTable, active: &ActiveFilterSet) -> Vec<usize> {
    (0..table.len())
        .filter(|&index| row_passes(table, index, active))
        .collect()
}

fn row_passes(table: &PlayerTable, index: usize, active: &ActiveFilterSet) -> bool {
    let row = &table.rows[index];
    for (column, value) in active.iter() {
        if !table.has_column(column) {
            continue;
        }
        let cell = row.cells.get(column).unwrap_or(&CellValue::Null);
        let passes = match value {
            FilterValue::Range { lo, hi } => cell
                .as_f64()
                .is_some_and(|v| !v.is_nan() && *lo <= v && v <= *hi),
            FilterValue::Selected(selected) => {
                selected.is_empty() || selected.contains(&cell.to_string())
            }
            FilterValue::Needle(needle) => {
                let needle = needle.trim();
                needle.is_empty()
                    || (!cell.is_null()
                        && cell
                            .to_string()
                            .to_lowercase()
                            .contains(&needle.to_lowercase()))
            }
            FilterValue::On(on) => !on || matches!(cell, CellValue::Bool(true)),
        };
        if !passes {
            return false;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
