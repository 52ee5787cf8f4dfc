use std::collections::HashSet;

use rayon::prelude::*;

use crate::collection::ParallelCollection;
use crate::hash::draw_unit;
use crate::plan::PlanState;
use crate::types::{DrawValue, ElementOffset, PartitionIndex, Seed};

/// One accepted element: which split claimed it and where it lives.
///
/// The draw is retained only so the corrector can rank elements without
/// re-deriving randomness; values of this type never outlive one sampling
/// operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampledElement {
    /// Index into the plan's split list.
    pub split: usize,
    /// Partition the element lives in.
    pub partition: PartitionIndex,
    /// Offset within the partition's stable iteration order.
    pub offset: ElementOffset,
    /// The uniform draw that landed in the split's interval.
    pub draw: DrawValue,
}

/// Per-partition sets of offsets already owned by some split.
pub type ClaimedOffsets = Vec<HashSet<ElementOffset>>;

/// Empty claim map for a collection with `partitions` partitions.
pub fn no_claims(partitions: usize) -> ClaimedOffsets {
    vec![HashSet::new(); partitions]
}

/// Run one threshold pass over the collection.
///
/// Each partition is scanned independently in parallel: per element, derive
/// the draw, locate the containing interval, and emit or drop. Offsets
/// present in `claimed` are skipped, which restricts supplementary rounds to
/// the unclaimed pool; pass [`no_claims`] for the first round. Output numbers
/// are binomially distributed around each split's target.
pub fn run_pass<T, C>(
    collection: &C,
    plan: &PlanState,
    seed: Seed,
    claimed: &ClaimedOffsets,
) -> Vec<SampledElement>
where
    T: Send + Sync,
    C: ParallelCollection<T>,
{
    let per_partition: Vec<Vec<SampledElement>> = (0..collection.partition_count())
        .into_par_iter()
        .map(|partition| {
            let skip = &claimed[partition];
            let mut hits = Vec::new();
            for (offset, _element) in collection.partition(partition).enumerate() {
                if skip.contains(&offset) {
                    continue;
                }
                let draw = draw_unit(seed, partition, offset);
                if let Some(split) = plan.locate(draw) {
                    hits.push(SampledElement {
                        split,
                        partition,
                        offset,
                        draw,
                    });
                }
            }
            hits
        })
        .collect();
    per_partition.into_iter().flatten().collect()
}
