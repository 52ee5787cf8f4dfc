use std::sync::Arc;

use rayon::prelude::*;

use crate::types::PartitionIndex;

/// Partitioned data interface consumed by the sampling passes.
///
/// Implementations expose stable sequential iteration within each partition;
/// the passes parallelize across partitions and never within one, so no
/// locking is required of implementors. Element identity during sampling is
/// `(partition index, offset within partition)`, which is why iteration
/// order must be stable for the lifetime of one sampling operation.
pub trait ParallelCollection<T>: Send + Sync {
    /// Number of partitions.
    fn partition_count(&self) -> usize;

    /// Iterate the elements of one partition in stable order.
    fn partition(&self, index: PartitionIndex) -> Box<dyn Iterator<Item = &T> + '_>;

    /// Number of elements in one partition.
    ///
    /// The default counts by iteration; implementations that know their
    /// lengths should override.
    fn partition_len(&self, index: PartitionIndex) -> usize {
        self.partition(index).count()
    }
}

/// Total element count: one parallel pass summing per-partition lengths.
pub fn parallel_count<T, C>(collection: &C) -> u64
where
    T: Send + Sync,
    C: ParallelCollection<T>,
{
    (0..collection.partition_count())
        .into_par_iter()
        .map(|index| collection.partition_len(index) as u64)
        .sum()
}

/// In-memory partitioned collection with explicit partition boundaries.
#[derive(Clone, Debug)]
pub struct InMemoryCollection<T> {
    partitions: Arc<Vec<Vec<T>>>,
}

impl<T> InMemoryCollection<T> {
    /// Create a collection from prebuilt partitions.
    pub fn new(partitions: Vec<Vec<T>>) -> Self {
        Self {
            partitions: Arc::new(partitions),
        }
    }

    /// Split a flat vector into `partitions` near-even contiguous chunks.
    pub fn from_flat(elements: Vec<T>, partitions: usize) -> Self {
        let wanted = partitions.max(1);
        let chunk = elements.len().div_ceil(wanted).max(1);
        let mut split = Vec::with_capacity(wanted);
        let mut rest = elements;
        while !rest.is_empty() {
            let tail = rest.split_off(chunk.min(rest.len()));
            split.push(rest);
            rest = tail;
        }
        if split.is_empty() {
            split.push(Vec::new());
        }
        Self::new(split)
    }
}

impl<T: Send + Sync> ParallelCollection<T> for InMemoryCollection<T> {
    fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    fn partition(&self, index: PartitionIndex) -> Box<dyn Iterator<Item = &T> + '_> {
        Box::new(self.partitions[index].iter())
    }

    fn partition_len(&self, index: PartitionIndex) -> usize {
        self.partitions[index].len()
    }
}
