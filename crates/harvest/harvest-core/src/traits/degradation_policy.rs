use crate::errors::ConfigurationError;
use crate::intent::Intent;
use crate::models::{DegradationAction, PolicySubject};

/// Declarative authority on missing or stale inputs.
pub trait IDegradationPolicy: Send + Sync {
    /// Decide what to do when `subject` is missing or stale for `intent`.
    /// An unmapped pair is a configuration error, never a silent pass-through.
    fn decide(
        &self,
        intent: &Intent,
        subject: &PolicySubject,
    ) -> Result<DegradationAction, ConfigurationError>;
}
