//! Startup configuration. Loaded once, never mutated per request.

pub mod aggregation_config;
pub mod context_config;
pub mod defaults;
pub mod degradation_config;
pub mod dispatch_config;
pub mod explanation_config;
pub mod observability_config;

use serde::{Deserialize, Serialize};

pub use aggregation_config::AggregationConfig;
pub use context_config::ContextConfig;
pub use degradation_config::{DegradationConfig, DegradationRule};
pub use dispatch_config::DispatchConfig;
pub use explanation_config::ExplanationConfig;
pub use observability_config::ObservabilityConfig;

use crate::errors::ConfigurationError;

/// Root configuration for the recommendation core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub dispatch: DispatchConfig,
    pub aggregation: AggregationConfig,
    pub explanation: ExplanationConfig,
    pub context: ContextConfig,
    pub degradation: DegradationConfig,
    pub observability: ObservabilityConfig,
}

impl HarvestConfig {
    /// Parse from TOML. Missing sections and keys take their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigurationError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigurationError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigurationError::Parse {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    /// Reject values the core cannot honour.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let invalid = |key: &str, reason: &str| ConfigurationError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };

        if self.dispatch.request_deadline_ms == 0 {
            return Err(invalid("dispatch.request_deadline_ms", "must be positive"));
        }
        if self.dispatch.advisor_timeout_ceiling_ms == 0 {
            return Err(invalid("dispatch.advisor_timeout_ceiling_ms", "must be positive"));
        }
        if self.aggregation.max_suggestions == 0 {
            return Err(invalid("aggregation.max_suggestions", "must be positive"));
        }
        let penalty = self.aggregation.degradation_penalty;
        if !(penalty > 0.0 && penalty <= 1.0) {
            return Err(invalid("aggregation.degradation_penalty", "must be in (0, 1]"));
        }
        let floor = self.aggregation.confidence_floor;
        if !(0.0..1.0).contains(&floor) {
            return Err(invalid("aggregation.confidence_floor", "must be in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.explanation.uncertainty_threshold) {
            return Err(invalid("explanation.uncertainty_threshold", "must be in [0, 1]"));
        }
        if self.context.source_timeout_ms == 0 {
            return Err(invalid("context.source_timeout_ms", "must be positive"));
        }
        Ok(())
    }
}
