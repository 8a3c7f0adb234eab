//! Per-advisor invocation outcomes collected by the dispatcher.

use serde::{Deserialize, Serialize};

use super::advisor::{AdvisorId, AdvisorResult};

/// Classification of an advisor error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorErrorKind {
    /// Upstream model or service unavailable.
    Unavailable,
    /// The context lacked something the advisor cannot work without.
    InvalidContext,
    /// The advisor returned structurally invalid output.
    InvalidOutput,
    Internal,
    /// The advisor panicked; the panic was contained.
    Panicked,
    /// The advisor observed cancellation and stopped.
    Cancelled,
}

impl AdvisorErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::InvalidContext => "invalid_context",
            Self::InvalidOutput => "invalid_output",
            Self::Internal => "internal",
            Self::Panicked => "panicked",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Non-fatal failure of one advisor invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PartialFailure {
    Timeout { after_ms: u64 },
    Error { kind: AdvisorErrorKind, message: String },
    Degraded { reason: String },
}

impl PartialFailure {
    pub fn error(kind: AdvisorErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Short user-facing description, used in disclaimers.
    pub fn describe(&self) -> String {
        match self {
            Self::Timeout { after_ms } => format!("timed out after {after_ms} ms"),
            Self::Error { kind, message } => format!("{}: {}", kind.as_str(), message),
            Self::Degraded { reason } => format!("degraded: {reason}"),
        }
    }
}

/// What came back from one advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvisorOutcome {
    Completed { result: AdvisorResult },
    /// Usable result that carries a caveat (e.g. stale input data).
    Degraded { result: AdvisorResult, failure: PartialFailure },
    Failed { failure: PartialFailure },
}

impl AdvisorOutcome {
    /// The result, if it may take part in aggregation.
    pub fn result(&self) -> Option<&AdvisorResult> {
        match self {
            Self::Completed { result } | Self::Degraded { result, .. } => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&PartialFailure> {
        match self {
            Self::Completed { .. } => None,
            Self::Degraded { failure, .. } | Self::Failed { failure } => Some(failure),
        }
    }

    pub fn is_lost(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// True when the advisor responded at all (anything except a timeout).
    pub fn responded(&self) -> bool {
        !matches!(self, Self::Failed { failure } if failure.is_timeout())
    }
}

/// Outcome of one advisor within a dispatch, tagged with its binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisorReport {
    pub advisor: AdvisorId,
    /// Registration order within the intent; the ranking tie-breaker.
    pub order: usize,
    pub required: bool,
    pub outcome: AdvisorOutcome,
    pub elapsed_ms: u64,
}
