use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::advisor::AdvisorId;
use super::context::ContextFieldKind;
use crate::errors::ConfigurationError;

/// What to do when a policy subject is missing or stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationAction {
    ProceedWithDisclaimer,
    SubstituteRegionalDefault,
    FailRequest,
}

impl DegradationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProceedWithDisclaimer => "proceed_with_disclaimer",
            Self::SubstituteRegionalDefault => "substitute_regional_default",
            Self::FailRequest => "fail_request",
        }
    }
}

/// The thing a degradation rule is about: a context field or an advisor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum PolicySubject {
    Field(ContextFieldKind),
    Advisor(AdvisorId),
}

impl PolicySubject {
    /// Parse a rule label: `field:<kind>`, `advisor:<id>`, or a bare field kind.
    pub fn parse(label: &str) -> Result<Self, ConfigurationError> {
        let label = label.trim();
        let unknown = || ConfigurationError::UnknownSubject {
            label: label.to_string(),
        };
        match label.split_once(':') {
            Some(("advisor", id)) if !id.trim().is_empty() => {
                Ok(Self::Advisor(AdvisorId::new(id.trim())))
            }
            Some(("field", kind)) => ContextFieldKind::parse(kind).map(Self::Field).ok_or_else(unknown),
            Some(_) => Err(unknown()),
            None => ContextFieldKind::parse(label).map(Self::Field).ok_or_else(unknown),
        }
    }
}

impl fmt::Display for PolicySubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(kind) => write!(f, "field:{kind}"),
            Self::Advisor(id) => write!(f, "advisor:{id}"),
        }
    }
}

/// A degradation event when a request proceeds on lower-quality input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

impl DegradationEvent {
    pub fn now(
        component: impl Into<String>,
        failure: impl Into<String>,
        fallback_used: impl Into<String>,
    ) -> Self {
        Self {
            component: component.into(),
            failure: failure.into(),
            fallback_used: fallback_used.into(),
            timestamp: Utc::now(),
        }
    }
}
