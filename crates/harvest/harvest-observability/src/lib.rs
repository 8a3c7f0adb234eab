//! # harvest-observability
//!
//! Structured logging for the recommendation core: subscriber setup,
//! per-stage span macros, event helpers, and degradation tracking.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
