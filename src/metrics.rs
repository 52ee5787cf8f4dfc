use crate::types::SplitName;

/// Accounting for one completed sampling operation.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleReport {
    /// Total input element count observed by the size pass.
    pub total: u64,
    /// Supplementary resample rounds consumed (0 in the common case).
    pub rounds_used: usize,
    /// Per-split outcome in request order.
    pub splits: Vec<SplitOutcome>,
}

/// How one split reached its exact requested size.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    /// Split name, as requested by the caller.
    pub split: SplitName,
    /// Exact size the caller requested.
    pub requested: u64,
    /// Elements accepted by the first threshold pass.
    pub first_pass: u64,
    /// Elements dropped by the over-trim.
    pub trimmed: u64,
    /// Elements added by supplementary rounds.
    pub resampled: u64,
}

impl SplitOutcome {
    /// Final element count: `first_pass - trimmed + resampled`. Equals
    /// `requested` for every split of a successful operation.
    pub fn attained(&self) -> u64 {
        self.first_pass - self.trimmed + self.resampled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attained_accounts_for_trim_and_resample() {
        let outcome = SplitOutcome {
            split: "train".to_string(),
            requested: 100,
            first_pass: 112,
            trimmed: 12,
            resampled: 0,
        };
        assert_eq!(outcome.attained(), 100);

        let outcome = SplitOutcome {
            split: "test".to_string(),
            requested: 100,
            first_pass: 91,
            trimmed: 0,
            resampled: 9,
        };
        assert_eq!(outcome.attained(), 100);
    }
}
