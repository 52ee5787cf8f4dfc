/// Constants used by the exact-size corrector.
pub mod corrector {
    /// Maximum number of supplementary resample rounds before a persistent
    /// shortfall is surfaced as an error.
    pub const RESAMPLE_ROUND_LIMIT: usize = 5;
}

/// Constants used by deterministic draw and seed derivation.
pub mod hash {
    /// Offset mixed into round-derived seed hashing so supplementary rounds
    /// draw independently of the first pass.
    pub const ROUND_SEED_OFFSET: u64 = 0x51CE_D5EE;
}

/// Constants used by threshold planning.
pub mod plan {
    /// Error bound used when interval overdraw is enabled without an explicit
    /// delta. Smaller values widen intervals more aggressively.
    pub const DEFAULT_OVERDRAW_DELTA: f64 = 5e-5;
}
