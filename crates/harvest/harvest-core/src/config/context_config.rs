use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::ContextFieldKind;

/// Context resolution configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Max age per field before data counts as stale (seconds).
    pub weather_max_age_secs: u64,
    pub soil_max_age_secs: u64,
    pub history_max_age_secs: u64,
    pub preferences_max_age_secs: u64,
    /// Per-source fetch timeout.
    pub source_timeout_ms: u64,
    /// Lifetime of last-good values kept for cache fallback.
    pub cache_ttl_secs: u64,
    pub cache_capacity: u64,
}

impl ContextConfig {
    pub fn max_age(&self, kind: ContextFieldKind) -> chrono::Duration {
        let secs = match kind {
            ContextFieldKind::Weather => self.weather_max_age_secs,
            ContextFieldKind::Soil => self.soil_max_age_secs,
            ContextFieldKind::CropHistory => self.history_max_age_secs,
            ContextFieldKind::Preferences => self.preferences_max_age_secs,
        };
        chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX / 1_000))
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_millis(self.source_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            weather_max_age_secs: defaults::DEFAULT_WEATHER_MAX_AGE_SECS,
            soil_max_age_secs: defaults::DEFAULT_SOIL_MAX_AGE_SECS,
            history_max_age_secs: defaults::DEFAULT_HISTORY_MAX_AGE_SECS,
            preferences_max_age_secs: defaults::DEFAULT_PREFERENCES_MAX_AGE_SECS,
            source_timeout_ms: defaults::DEFAULT_SOURCE_TIMEOUT_MS,
            cache_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
            cache_capacity: defaults::DEFAULT_CACHE_CAPACITY,
        }
    }
}
