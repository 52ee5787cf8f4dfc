/// Name of one requested output split.
/// Examples: `train`, `validation`, `test`
pub type SplitName = String;
/// Uniform pseudo-random value in `[0, 1)` used for threshold inclusion.
pub type DrawValue = f64;
/// Seed for deterministic per-element draw derivation.
pub type Seed = u64;
/// Index of a partition within a collection.
pub type PartitionIndex = usize;
/// Offset of an element within its partition's stable iteration order.
pub type ElementOffset = usize;
