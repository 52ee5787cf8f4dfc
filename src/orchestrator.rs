use std::collections::HashMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::collection::{parallel_count, ParallelCollection};
use crate::config::{SampleOptions, SplitRequest};
use crate::corrector::correct;
use crate::errors::SampleError;
use crate::metrics::{SampleReport, SplitOutcome};
use crate::plan;
use crate::sampler::{no_claims, run_pass, SampledElement};
use crate::types::{ElementOffset, SplitName};

/// Output of one sampling operation.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleResult<T> {
    /// Elements per split in request order; each split holds exactly its
    /// requested size, is disjoint from every other split, and is a subset
    /// of the input.
    pub splits: IndexMap<SplitName, Vec<T>>,
    /// Accounting for the operation.
    pub report: SampleReport,
}

/// Sample exact-size disjoint splits from a partitioned collection.
///
/// Sequencing: one counting pass, request resolution and validation,
/// interval planning, the threshold pass, exact-size correction, then one
/// materialization pass cloning the claimed elements. Errors abort between
/// passes with no partial side effects.
///
/// Reproducibility holds for identical `(input, seed, request)` under a
/// fixed partitioning; a different partition layout of the same logical data
/// may yield a different (equally valid) sample.
pub fn scalable_sample<T, C>(
    collection: &C,
    request: &SplitRequest,
    options: &SampleOptions,
) -> Result<SampleResult<T>, SampleError>
where
    T: Clone + Send + Sync,
    C: ParallelCollection<T>,
{
    let total = parallel_count(collection);
    let resolved = request.resolve(total)?;
    let requested: u64 = resolved.iter().map(|(_, size)| *size).sum();
    if total == 0 && requested > 0 {
        return Err(SampleError::EmptyInput { requested });
    }

    let plan_state = plan::plan(total, &resolved, options.overdraw_delta)?;
    let first_pass = run_pass(
        collection,
        &plan_state,
        options.seed,
        &no_claims(collection.partition_count()),
    );
    debug!(
        total,
        requested,
        first_pass = first_pass.len(),
        "threshold pass complete"
    );
    let outcome = correct(collection, &plan_state, first_pass, options, total)?;

    let splits = materialize(collection, resolved.len(), &outcome.per_split)
        .into_iter()
        .zip(&resolved)
        .map(|(bucket, (name, _))| (name.clone(), bucket))
        .collect();

    let report = SampleReport {
        total,
        rounds_used: outcome.rounds_used,
        splits: resolved
            .iter()
            .enumerate()
            .map(|(index, (name, size))| SplitOutcome {
                split: name.clone(),
                requested: *size,
                first_pass: outcome.first_pass[index],
                trimmed: outcome.trimmed[index],
                resampled: outcome.resampled[index],
            })
            .collect(),
    };
    info!(
        total,
        requested,
        rounds = report.rounds_used,
        "sampling complete"
    );
    Ok(SampleResult { splits, report })
}

/// [`scalable_sample`] with default options (seed 0, default resample
/// budget, no overdraw).
pub fn scalable_sample_default<T, C>(
    collection: &C,
    request: &SplitRequest,
) -> Result<SampleResult<T>, SampleError>
where
    T: Clone + Send + Sync,
    C: ParallelCollection<T>,
{
    scalable_sample(collection, request, &SampleOptions::default())
}

/// One parallel pass cloning each claimed element into its split's bucket.
///
/// Bucket order follows (partition, offset); callers get no ordering
/// guarantee beyond determinism for a fixed layout.
fn materialize<T, C>(
    collection: &C,
    split_count: usize,
    per_split: &[Vec<SampledElement>],
) -> Vec<Vec<T>>
where
    T: Clone + Send + Sync,
    C: ParallelCollection<T>,
{
    let mut assignment: Vec<HashMap<ElementOffset, usize>> =
        vec![HashMap::new(); collection.partition_count()];
    for (index, hits) in per_split.iter().enumerate() {
        for element in hits {
            assignment[element.partition].insert(element.offset, index);
        }
    }

    let picked: Vec<Vec<(usize, T)>> = (0..collection.partition_count())
        .into_par_iter()
        .map(|partition| {
            let owners = &assignment[partition];
            collection
                .partition(partition)
                .enumerate()
                .filter_map(|(offset, element)| {
                    owners.get(&offset).map(|&split| (split, element.clone()))
                })
                .collect()
        })
        .collect();

    let mut buckets: Vec<Vec<T>> = (0..split_count).map(|_| Vec::new()).collect();
    for partition in picked {
        for (split, element) in partition {
            buckets[split].push(element);
        }
    }
    buckets
}
