use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Dispatcher timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Overall request deadline. Authoritative over every per-advisor timeout.
    pub request_deadline_ms: u64,
    /// Ceiling on any single advisor call.
    pub advisor_timeout_ceiling_ms: u64,
}

impl DispatchConfig {
    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }

    pub fn advisor_timeout_ceiling(&self) -> Duration {
        Duration::from_millis(self.advisor_timeout_ceiling_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_deadline_ms: defaults::DEFAULT_REQUEST_DEADLINE_MS,
            advisor_timeout_ceiling_ms: defaults::DEFAULT_ADVISOR_TIMEOUT_CEILING_MS,
        }
    }
}
