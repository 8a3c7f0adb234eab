//! JSON-described engine scenarios under `data/scenarios/`.

use std::time::Duration;

use harvest_core::errors::AdvisorError;
use harvest_core::models::AdvisorResult;
use serde::Deserialize;

use crate::advisors::ScriptedAdvisor;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub intent: String,
    pub region: String,
    /// Request deadline override.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    #[serde(default)]
    pub degradation_penalty: Option<f64>,
    pub advisors: Vec<ScenarioAdvisor>,
    pub expect: Expectation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioAdvisor {
    pub id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub delay_ms: u64,
    pub outcome: ScenarioOutcome,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    Result { result: AdvisorResult },
    Error { reason: String },
    Panic,
    Hang,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Expectation {
    /// `HarvestError::kind()` label when the request should fail.
    pub error_kind: Option<String>,
    pub titles: Option<Vec<String>>,
    pub confidence: Option<f64>,
    pub disclaimer_contains: Vec<String>,
    pub uncertainties_non_empty: bool,
}

impl ScenarioAdvisor {
    pub fn build(&self) -> ScriptedAdvisor {
        let advisor = match &self.outcome {
            ScenarioOutcome::Result { result } => ScriptedAdvisor::returning(&self.id, result.clone()),
            ScenarioOutcome::Error { reason } => ScriptedAdvisor::failing(
                &self.id,
                AdvisorError::Unavailable {
                    reason: reason.clone(),
                },
            ),
            ScenarioOutcome::Panic => ScriptedAdvisor::panicking(&self.id),
            ScenarioOutcome::Hang => ScriptedAdvisor::hanging(&self.id),
        };
        advisor.with_delay(Duration::from_millis(self.delay_ms))
    }
}
