use std::cmp::Ordering;

use tracing::{debug, warn};

use crate::collection::ParallelCollection;
use crate::config::SampleOptions;
use crate::constants::plan::DEFAULT_OVERDRAW_DELTA;
use crate::errors::{SampleError, ShortfallReport};
use crate::hash::round_seed;
use crate::plan::{self, PlanState};
use crate::sampler::{no_claims, run_pass, SampledElement};
use crate::types::SplitName;

/// Correction state of one split relative to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SplitState {
    /// Realized count below target; needs supplementary rounds.
    Under,
    /// Realized count matches target; terminal.
    Exact,
    /// Realized count above target; trimmed by draw value.
    Over,
}

fn state_of(realized: usize, target: u64) -> SplitState {
    match (realized as u64).cmp(&target) {
        Ordering::Less => SplitState::Under,
        Ordering::Equal => SplitState::Exact,
        Ordering::Greater => SplitState::Over,
    }
}

/// Result of correction: exact-size claims per split plus pass accounting.
#[derive(Clone, Debug)]
pub struct CorrectionOutcome {
    /// Claimed elements per split, each exactly the split's target size,
    /// indexed like the plan's split list.
    pub per_split: Vec<Vec<SampledElement>>,
    /// Supplementary rounds consumed (0 when the first pass sufficed).
    pub rounds_used: usize,
    /// Per-split first-pass realized counts.
    pub first_pass: Vec<u64>,
    /// Per-split counts dropped by the over-trim.
    pub trimmed: Vec<u64>,
    /// Per-split counts added by supplementary rounds.
    pub resampled: Vec<u64>,
}

/// Total order on sampled elements by draw value.
///
/// Ties (measure-zero on distinct identities, but possible in principle) are
/// broken by element identity so the trim is fully deterministic.
fn by_draw(a: &SampledElement, b: &SampledElement) -> Ordering {
    a.draw
        .total_cmp(&b.draw)
        .then_with(|| a.partition.cmp(&b.partition))
        .then_with(|| a.offset.cmp(&b.offset))
}

/// Reconcile binomially distributed first-pass counts with exact targets.
///
/// Splits over target are trimmed to the `target` smallest draw values,
/// which is a uniform subselection because draws are uniform and independent
/// of element content. Splits under target are refilled by re-planning over
/// the unclaimed pool with a fresh round seed, bounded by the options'
/// resample budget. A persistent shortfall fails with
/// [`SampleError::ResidualShortfall`] rather than looping.
pub fn correct<T, C>(
    collection: &C,
    plan_state: &PlanState,
    first_pass: Vec<SampledElement>,
    options: &SampleOptions,
    total: u64,
) -> Result<CorrectionOutcome, SampleError>
where
    T: Send + Sync,
    C: ParallelCollection<T>,
{
    let split_count = plan_state.len();
    let mut per_split: Vec<Vec<SampledElement>> = vec![Vec::new(); split_count];
    for element in first_pass {
        per_split[element.split].push(element);
    }
    let first_pass_counts: Vec<u64> = per_split.iter().map(|hits| hits.len() as u64).collect();
    let mut trimmed = vec![0_u64; split_count];
    let mut resampled = vec![0_u64; split_count];

    for (index, split) in plan_state.splits().iter().enumerate() {
        if state_of(per_split[index].len(), split.target) == SplitState::Over {
            let hits = &mut per_split[index];
            hits.sort_unstable_by(by_draw);
            trimmed[index] = (hits.len() as u64) - split.target;
            hits.truncate(split.target as usize);
        }
    }

    let mut claimed = no_claims(collection.partition_count());
    let mut claimed_count = 0_u64;
    for hits in &per_split {
        for element in hits {
            claimed[element.partition].insert(element.offset);
        }
        claimed_count += hits.len() as u64;
    }

    let mut rounds_used = 0;
    for round in 1..=options.resample_rounds {
        let shortfalls: Vec<(usize, u64)> = plan_state
            .splits()
            .iter()
            .enumerate()
            .filter_map(|(index, split)| {
                let missing = split.target.saturating_sub(per_split[index].len() as u64);
                (missing > 0).then_some((index, missing))
            })
            .collect();
        if shortfalls.is_empty() {
            break;
        }
        let unclaimed = total - claimed_count;
        if unclaimed == 0 {
            break;
        }
        rounds_used = round;
        debug!(
            round,
            unclaimed,
            shortfall_splits = shortfalls.len(),
            "resampling shortfall splits"
        );

        // Sub-plan over the unclaimed pool, shortfall splits only. Rounds
        // always widen their intervals: a small shortfall over a small pool
        // can then claim the whole remainder in one round instead of
        // stalling on a near-miss probability.
        let sub_request: Vec<(SplitName, u64)> = shortfalls
            .iter()
            .map(|(index, missing)| (plan_state.splits()[*index].name.clone(), *missing))
            .collect();
        let delta = options.overdraw_delta.unwrap_or(DEFAULT_OVERDRAW_DELTA);
        let sub_plan = plan::plan(unclaimed, &sub_request, Some(delta))?;
        let seed = round_seed(options.seed, round);
        let mut round_hits: Vec<Vec<SampledElement>> = vec![Vec::new(); shortfalls.len()];
        for hit in run_pass(collection, &sub_plan, seed, &claimed) {
            round_hits[hit.split].push(hit);
        }

        for ((index, missing), mut hits) in shortfalls.into_iter().zip(round_hits) {
            // A round can itself overshoot; keep only the smallest draws.
            hits.sort_unstable_by(by_draw);
            hits.truncate(missing as usize);
            for hit in hits {
                claimed[hit.partition].insert(hit.offset);
                claimed_count += 1;
                resampled[index] += 1;
                per_split[index].push(SampledElement {
                    split: index,
                    ..hit
                });
            }
        }
    }

    let shortfalls: Vec<ShortfallReport> = plan_state
        .splits()
        .iter()
        .enumerate()
        .filter(|(index, split)| (per_split[*index].len() as u64) < split.target)
        .map(|(index, split)| ShortfallReport {
            split: split.name.clone(),
            attained: per_split[index].len() as u64,
            requested: split.target,
        })
        .collect();
    if !shortfalls.is_empty() {
        warn!(
            rounds = rounds_used,
            short_splits = shortfalls.len(),
            "resample budget exhausted with residual shortfall"
        );
        return Err(SampleError::ResidualShortfall {
            rounds: rounds_used,
            attained: shortfalls,
        });
    }

    Ok(CorrectionOutcome {
        per_split,
        rounds_used,
        first_pass: first_pass_counts,
        trimmed,
        resampled,
    })
}
