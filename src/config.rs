use indexmap::IndexMap;

use crate::constants::corrector::RESAMPLE_ROUND_LIMIT;
use crate::errors::SampleError;
use crate::types::{Seed, SplitName};

/// Requested size for one split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SplitSpec {
    /// Exact number of elements.
    Count(u64),
    /// Fraction of the total input count, resolved to `floor(ratio * N)`
    /// once the input has been counted. Must lie in `(0.0, 1.0]`.
    Ratio(f64),
}

/// Ordered mapping from split name to requested size.
///
/// Caller order is preserved and determines acceptance-interval placement;
/// it has no effect on sample quality. Inserting a name twice replaces the
/// earlier spec, so names are always unique.
#[derive(Clone, Debug, Default)]
pub struct SplitRequest {
    splits: IndexMap<SplitName, SplitSpec>,
}

impl SplitRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a split with an exact element count.
    pub fn with_count(mut self, name: impl Into<SplitName>, count: u64) -> Self {
        self.splits.insert(name.into(), SplitSpec::Count(count));
        self
    }

    /// Add a split sized as a fraction of the input.
    pub fn with_ratio(mut self, name: impl Into<SplitName>, ratio: f64) -> Self {
        self.splits.insert(name.into(), SplitSpec::Ratio(ratio));
        self
    }

    /// Number of requested splits.
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Whether no splits have been requested.
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Iterate requested splits in caller order.
    pub fn iter(&self) -> impl Iterator<Item = (&SplitName, &SplitSpec)> {
        self.splits.iter()
    }

    /// Resolve every spec to an exact size against the total input count,
    /// preserving caller order.
    pub fn resolve(&self, total: u64) -> Result<Vec<(SplitName, u64)>, SampleError> {
        let mut resolved = Vec::with_capacity(self.splits.len());
        for (name, spec) in &self.splits {
            let size = match spec {
                SplitSpec::Count(count) => *count,
                SplitSpec::Ratio(ratio) => {
                    if !(*ratio > 0.0 && *ratio <= 1.0) {
                        return Err(SampleError::Configuration(format!(
                            "split '{name}' ratio {ratio} outside (0.0, 1.0]"
                        )));
                    }
                    (ratio * total as f64).floor() as u64
                }
            };
            resolved.push((name.clone(), size));
        }
        Ok(resolved)
    }
}

/// Tunable knobs for one sampling operation.
#[derive(Clone, Debug)]
pub struct SampleOptions {
    /// Seed for deterministic per-element draws. Identical
    /// `(input, seed, request)` triples produce identical output for a fixed
    /// partitioning of the input.
    pub seed: Seed,
    /// Maximum supplementary resample rounds before a persistent shortfall
    /// fails with [`SampleError::ResidualShortfall`].
    pub resample_rounds: usize,
    /// Optional error bound that widens acceptance intervals beyond their
    /// exact `size / N` lengths so first-pass shortfalls become rare and the
    /// cheap trim path dominates. `None` keeps interval lengths exact.
    pub overdraw_delta: Option<f64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            resample_rounds: RESAMPLE_ROUND_LIMIT,
            overdraw_delta: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_preserves_caller_order() {
        let request = SplitRequest::new()
            .with_count("train", 700)
            .with_count("validation", 150)
            .with_count("test", 150);
        let resolved = request.resolve(1000).expect("resolve");
        let names: Vec<&str> = resolved.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["train", "validation", "test"]);
    }

    #[test]
    fn resolve_converts_ratios_by_truncation() {
        let request = SplitRequest::new()
            .with_ratio("a", 0.5)
            .with_ratio("b", 0.333);
        let resolved = request.resolve(1000).expect("resolve");
        assert_eq!(resolved[0].1, 500);
        assert_eq!(resolved[1].1, 333);
    }

    #[test]
    fn resolve_rejects_out_of_range_ratio() {
        let request = SplitRequest::new().with_ratio("a", 1.5);
        assert!(matches!(
            request.resolve(10),
            Err(SampleError::Configuration(_))
        ));
        let request = SplitRequest::new().with_ratio("a", 0.0);
        assert!(matches!(
            request.resolve(10),
            Err(SampleError::Configuration(_))
        ));
    }

    #[test]
    fn duplicate_name_replaces_earlier_spec() {
        let request = SplitRequest::new().with_count("a", 1).with_count("a", 2);
        assert_eq!(request.len(), 1);
        let resolved = request.resolve(10).expect("resolve");
        assert_eq!(resolved[0].1, 2);
    }
}
