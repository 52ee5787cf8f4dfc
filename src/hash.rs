use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::constants::hash::ROUND_SEED_OFFSET;
use crate::types::{DrawValue, ElementOffset, PartitionIndex, Seed};

/// Stable hash over caller-fed components.
pub fn stable_hash_with(f: impl FnOnce(&mut DefaultHasher)) -> u64 {
    let mut hasher = DefaultHasher::new();
    f(&mut hasher);
    hasher.finish()
}

/// splitmix64 finalizer: avalanches a 64-bit state into a well-distributed
/// output word.
fn mix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic uniform draw in `[0, 1)` for one element identity.
///
/// Pure function of `(seed, partition, offset)`, so the same draw can be
/// re-derived during correction without storing it, and parallel workers
/// share no state.
pub fn draw_unit(seed: Seed, partition: PartitionIndex, offset: ElementOffset) -> DrawValue {
    let identity = stable_hash_with(|hasher| {
        seed.hash(hasher);
        partition.hash(hasher);
        offset.hash(hasher);
    });
    // Top 53 bits scaled into the unit interval.
    (mix64(identity) >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Derive the seed for one supplementary resample round.
pub fn round_seed(seed: Seed, round: usize) -> Seed {
    stable_hash_with(|hasher| {
        seed.hash(hasher);
        ROUND_SEED_OFFSET.hash(hasher);
        round.hash(hasher);
    })
}
