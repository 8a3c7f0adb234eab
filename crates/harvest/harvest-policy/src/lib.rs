//! # harvest-policy
//!
//! The degradation policy: a static `(intent, subject) -> action` table
//! consulted by the context resolver (substitution) and the aggregator
//! (fail-closed on required advisor loss).

pub mod coverage;
pub mod declarative;

pub use coverage::{ensure_total, missing_rules};
pub use declarative::{DeclarativePolicy, WILDCARD_INTENT};
