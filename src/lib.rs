#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Partitioned collection interface and the in-memory implementation.
pub mod collection;
/// Split requests, size specs, and sampling options.
pub mod config;
/// Centralized constants used across planning, sampling, and correction.
pub mod constants;
/// Exact-size correction (over-trim and bounded shortfall resampling).
pub mod corrector;
/// Deterministic per-element draw derivation.
pub mod hash;
/// Per-operation accounting report types.
pub mod metrics;
/// Sampling orchestration and the public entry points.
pub mod orchestrator;
/// Acceptance-interval layout over the unit range.
pub mod plan;
/// The parallel threshold pass.
pub mod sampler;
/// Shared type aliases.
pub mod types;

mod errors;

pub use collection::{InMemoryCollection, ParallelCollection};
pub use config::{SampleOptions, SplitRequest, SplitSpec};
pub use errors::{SampleError, ShortfallReport};
pub use metrics::{SampleReport, SplitOutcome};
pub use orchestrator::{scalable_sample, scalable_sample_default, SampleResult};
pub use plan::{Interval, PlanState, SplitPlan};
pub use types::{DrawValue, ElementOffset, PartitionIndex, Seed, SplitName};
