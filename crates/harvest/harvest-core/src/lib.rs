//! # harvest-core
//!
//! Foundation crate for the Harvest recommendation core.
//! Defines the shared types, advisor/context/policy traits, errors, config,
//! and constants. Every other crate in the workspace depends on this.

pub mod cancellation;
pub mod confidence;
pub mod config;
pub mod constants;
pub mod errors;
pub mod intent;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use cancellation::{Cancellable, CancellationToken};
pub use confidence::Confidence;
pub use config::HarvestConfig;
pub use errors::{ConfigurationError, HarvestError, HarvestResult, MissingInput};
pub use intent::Intent;
pub use models::{AdvisorId, AdvisorResult, ContextFieldKind, Recommendation, RecommendationContext};
