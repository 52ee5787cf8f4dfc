use tracing::debug;

use crate::errors::SampleError;
use crate::types::{DrawValue, SplitName};

/// Half-open acceptance range `[lo, hi)` within the unit interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Inclusive lower bound.
    pub lo: f64,
    /// Exclusive upper bound.
    pub hi: f64,
}

impl Interval {
    /// Whether `draw` falls inside this range.
    pub fn contains(&self, draw: DrawValue) -> bool {
        draw >= self.lo && draw < self.hi
    }

    /// Length of the range.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
}

/// One split's share of a plan: its acceptance interval and exact target.
///
/// The interval secures independence and disjointness; the target secures
/// exactness during correction.
#[derive(Clone, Debug)]
pub struct SplitPlan {
    /// Split name, as requested by the caller.
    pub name: SplitName,
    /// Acceptance interval within `[0, 1)`, disjoint from every other split.
    pub interval: Interval,
    /// Exact requested size.
    pub target: u64,
}

/// Immutable acceptance-interval layout for one `(total, request)` pair.
#[derive(Clone, Debug)]
pub struct PlanState {
    splits: Vec<SplitPlan>,
}

impl PlanState {
    /// Planned splits in request order.
    pub fn splits(&self) -> &[SplitPlan] {
        &self.splits
    }

    /// Number of planned splits.
    pub fn len(&self) -> usize {
        self.splits.len()
    }

    /// Whether the plan holds no splits.
    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Index of the split whose interval contains `draw`, if any.
    ///
    /// At most one interval can match by the disjointness invariant. The
    /// split count is small, so a linear scan suffices.
    pub fn locate(&self, draw: DrawValue) -> Option<usize> {
        self.splits
            .iter()
            .position(|split| split.interval.contains(draw))
    }
}

/// Lay out disjoint acceptance intervals for a resolved request.
///
/// Split `i` with size `n_i` gets probability `n_i / total` and the interval
/// `[offset, offset + n_i / total)`, with the offset walking forward in
/// request order. Fails with [`SampleError::Oversubscribed`] before any data
/// pass when the sizes sum past `total`.
pub fn plan(
    total: u64,
    resolved: &[(SplitName, u64)],
    overdraw_delta: Option<f64>,
) -> Result<PlanState, SampleError> {
    let requested: u64 = resolved.iter().map(|(_, size)| *size).sum();
    if requested > total {
        return Err(SampleError::Oversubscribed {
            requested,
            available: total,
        });
    }

    let mut offset = 0.0_f64;
    let mut splits = Vec::with_capacity(resolved.len());
    for (name, target) in resolved {
        let probability = if total == 0 {
            0.0
        } else {
            *target as f64 / total as f64
        };
        let hi = (offset + probability).min(1.0);
        splits.push(SplitPlan {
            name: name.clone(),
            interval: Interval { lo: offset, hi },
            target: *target,
        });
        offset = hi;
    }

    if let Some(delta) = overdraw_delta {
        widen(&mut splits, total, delta)?;
    }
    debug!(
        total,
        requested,
        splits = splits.len(),
        coverage = offset,
        "interval plan laid out"
    );
    Ok(PlanState { splits })
}

/// Widen each nonempty interval by the binomial tail bound
/// `gamma + sqrt(gamma^2 + 2 * gamma * p)` with `gamma = -ln(delta) / total`,
/// scaled down if needed so the union stays within `[0, 1)` and intervals
/// stay disjoint.
fn widen(splits: &mut [SplitPlan], total: u64, delta: f64) -> Result<(), SampleError> {
    if !(delta > 0.0 && delta < 1.0) {
        return Err(SampleError::Configuration(format!(
            "overdraw delta {delta} outside (0.0, 1.0)"
        )));
    }
    if total == 0 {
        return Ok(());
    }
    let gamma = -delta.ln() / total as f64;
    let extras: Vec<f64> = splits
        .iter()
        .map(|split| {
            let p = split.interval.width();
            if p == 0.0 {
                0.0
            } else {
                gamma + (gamma * gamma + 2.0 * gamma * p).sqrt()
            }
        })
        .collect();

    let base: f64 = splits.iter().map(|split| split.interval.width()).sum();
    let slack = 1.0 - base;
    let extra_total: f64 = extras.iter().sum();
    let scale = if extra_total > slack {
        slack / extra_total
    } else {
        1.0
    };

    let mut offset = 0.0_f64;
    for (split, extra) in splits.iter_mut().zip(&extras) {
        let hi = (offset + split.interval.width() + extra * scale).min(1.0);
        split.interval = Interval { lo: offset, hi };
        offset = hi;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(sizes: &[(&str, u64)]) -> Vec<(SplitName, u64)> {
        sizes
            .iter()
            .map(|(name, size)| (name.to_string(), *size))
            .collect()
    }

    #[test]
    fn intervals_are_contiguous_and_sized_by_probability() {
        let state = plan(1000, &resolved(&[("train", 700), ("test", 150)]), None).expect("plan");
        let splits = state.splits();
        assert_eq!(splits[0].interval, Interval { lo: 0.0, hi: 0.7 });
        assert!((splits[1].interval.lo - 0.7).abs() < 1e-12);
        assert!((splits[1].interval.width() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn oversubscribed_fails_before_any_pass() {
        let err = plan(10, &resolved(&[("a", 11)]), None).expect_err("oversubscribed");
        assert!(matches!(
            err,
            SampleError::Oversubscribed {
                requested: 11,
                available: 10
            }
        ));
    }

    #[test]
    fn zero_size_split_gets_zero_width_interval() {
        let state = plan(100, &resolved(&[("a", 0), ("b", 50)]), None).expect("plan");
        assert_eq!(state.splits()[0].interval.width(), 0.0);
        assert!(state.locate(0.0).is_some());
        assert_eq!(state.locate(0.0), Some(1));
    }

    #[test]
    fn locate_respects_half_open_bounds() {
        let state = plan(10, &resolved(&[("a", 5), ("b", 5)]), None).expect("plan");
        assert_eq!(state.locate(0.0), Some(0));
        assert_eq!(state.locate(0.499_999), Some(0));
        assert_eq!(state.locate(0.5), Some(1));
        assert_eq!(state.locate(0.999_999), Some(1));
    }

    #[test]
    fn widen_grows_intervals_but_keeps_union_within_unit_range() {
        let state = plan(100, &resolved(&[("a", 30), ("b", 20)]), Some(5e-5)).expect("plan");
        let splits = state.splits();
        assert!(splits[0].interval.width() > 0.3);
        assert!(splits[1].interval.width() > 0.2);
        assert!((splits[1].interval.lo - splits[0].interval.hi).abs() < 1e-12);
        assert!(splits[1].interval.hi <= 1.0);
    }

    #[test]
    fn widen_with_no_slack_leaves_intervals_exact() {
        let state = plan(100, &resolved(&[("a", 60), ("b", 40)]), Some(5e-5)).expect("plan");
        let splits = state.splits();
        assert!((splits[0].interval.width() - 0.6).abs() < 1e-12);
        assert!((splits[1].interval.hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn widen_rejects_bad_delta() {
        assert!(matches!(
            plan(100, &resolved(&[("a", 10)]), Some(0.0)),
            Err(SampleError::Configuration(_))
        ));
    }
}
