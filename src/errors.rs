use thiserror::Error;

use crate::types::SplitName;

/// Attained-versus-requested count for a split that remained short after the
/// resample budget was exhausted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortfallReport {
    /// Name of the short split.
    pub split: SplitName,
    /// Elements attained for this split.
    pub attained: u64,
    /// Exact size the caller requested.
    pub requested: u64,
}

/// Error type for request validation and sampling failures.
///
/// Every variant is detected deterministically from counts; none reflects a
/// transient condition worth retrying.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The input collection is empty but a split requested a positive size.
    #[error("input collection is empty but {requested} element(s) were requested")]
    EmptyInput {
        /// Total elements requested across all splits.
        requested: u64,
    },
    /// The requested sizes sum to more than the input holds.
    #[error("requested {requested} element(s) but only {available} are available")]
    Oversubscribed {
        /// Total elements requested across all splits.
        requested: u64,
        /// Total elements in the input collection.
        available: u64,
    },
    /// One or more splits remained below target after the resample budget.
    #[error("shortfall remains after {rounds} resample round(s): {attained:?}")]
    ResidualShortfall {
        /// Supplementary rounds consumed before giving up.
        rounds: usize,
        /// Partial counts for each split still below target.
        attained: Vec<ShortfallReport>,
    },
    /// Invalid request or options (bad ratio, bad overdraw delta).
    #[error("configuration error: {0}")]
    Configuration(String),
}
