//! # harvest-orchestrator
//!
//! The recommendation pipeline:
//! registry lookup → context resolution → concurrent advisor dispatch under a
//! request deadline → aggregation (fail-closed on required loss, ranked merge,
//! composite confidence) → explanation.

pub mod aggregation;
pub mod dispatch;
pub mod engine;
pub mod explanation;
pub mod registry;

pub use aggregation::{Aggregate, Aggregator};
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use engine::RecommendationEngine;
pub use explanation::ExplanationComposer;
pub use registry::{AdvisorBinding, AdvisorRegistry};
