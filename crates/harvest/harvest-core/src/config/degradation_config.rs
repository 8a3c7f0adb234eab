use serde::{Deserialize, Serialize};

use crate::models::DegradationAction;

/// One `(intent, subject) -> action` entry of the degradation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradationRule {
    /// Intent label, e.g. `irrigation_advice`.
    pub intent: String,
    /// `field:<kind>`, `advisor:<id>`, or a bare field kind.
    pub subject: String,
    pub action: DegradationAction,
}

/// Declarative degradation rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DegradationConfig {
    pub rules: Vec<DegradationRule>,
}
