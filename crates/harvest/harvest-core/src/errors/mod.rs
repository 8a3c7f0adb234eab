mod advisor_error;
mod configuration_error;
mod context_error;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use advisor_error::AdvisorError;
pub use configuration_error::ConfigurationError;
pub use context_error::{ContextError, SourceError};

use crate::intent::Intent;
use crate::models::{AdvisorId, ContextFieldKind};

/// The input whose absence made a request fail closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum MissingInput {
    Advisor(AdvisorId),
    ContextField(ContextFieldKind),
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advisor(id) => write!(f, "advisor '{id}'"),
            Self::ContextField(kind) => write!(f, "context field '{kind}'"),
        }
    }
}

/// Top-level error type for the Harvest recommendation core.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("no advisors configured for intent {intent}")]
    NoAdvisorsConfigured { intent: Intent },

    #[error("insufficient data for {intent}: {missing} unavailable ({reason})")]
    InsufficientData {
        intent: Intent,
        missing: MissingInput,
        reason: String,
    },

    #[error("request for {intent} exceeded its {deadline_ms} ms deadline with no advisor responses")]
    Timeout { intent: Intent, deadline_ms: u64 },

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("context error: {0}")]
    Context(#[from] ContextError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl HarvestError {
    /// Stable label for logs and callers that branch on the failure type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoAdvisorsConfigured { .. } => "no_advisors_configured",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::Timeout { .. } => "timeout",
            Self::Configuration(_) => "configuration",
            Self::Context(_) => "context",
            Self::SerializationError(_) => "serialization",
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type HarvestResult<T> = Result<T, HarvestError>;
