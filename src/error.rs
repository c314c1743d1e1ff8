use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Errors surfaced by the data and analysis layers.
///
/// Loader and store failures carry file or SQL context through `anyhow`
/// instead; these variants are the ones the UI matches on to decide what
/// to show next to a chart or table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoutError {
    #[error("required column '{0}' is missing from the dataset")]
    MissingColumn(String),

    #[error("no player rows found in {0}")]
    EmptyDataset(String),

    #[error("'{0}' is not a numeric metric")]
    InvalidMetric(String),

    #[error("player '{0}' not found in the dataset")]
    PlayerNotFound(String),

    #[error("need at least {needed} numeric metrics, got {got}")]
    InsufficientMetrics { needed: usize, got: usize },
}
