use serde::{Deserialize, Serialize};

use super::defaults;

/// Explanation composer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationConfig {
    /// Composite confidence below this adds an uncertainty entry.
    pub uncertainty_threshold: f64,
    /// Maximum key factors kept after ranking.
    pub max_factors: usize,
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            uncertainty_threshold: defaults::DEFAULT_UNCERTAINTY_THRESHOLD,
            max_factors: defaults::DEFAULT_MAX_FACTORS,
        }
    }
}
