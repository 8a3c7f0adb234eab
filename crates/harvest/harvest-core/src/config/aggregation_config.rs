use serde::{Deserialize, Serialize};

use super::defaults;

/// Aggregator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Maximum suggestions kept after ranking.
    pub max_suggestions: usize,
    /// Composite confidence never drops below this.
    pub confidence_floor: f64,
    /// Multiplier applied once per lost non-required advisor. In (0, 1].
    pub degradation_penalty: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            max_suggestions: defaults::DEFAULT_MAX_SUGGESTIONS,
            confidence_floor: defaults::DEFAULT_CONFIDENCE_FLOOR,
            degradation_penalty: defaults::DEFAULT_DEGRADATION_PENALTY,
        }
    }
}
