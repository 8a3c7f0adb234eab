/// Harvest core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// End-to-end latency contract for one recommendation request (milliseconds).
pub const END_TO_END_CONTRACT_MS: u64 = 10_000;

/// Upper bound on suggestions accepted from a single advisor invocation.
/// Larger outputs are rejected as invalid rather than truncated.
pub const MAX_SUGGESTIONS_PER_ADVISOR: usize = 200;

/// Tolerance when comparing composite scores; closer scores count as tied.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Environment variable read by the tracing setup.
pub const LOG_ENV_VAR: &str = "HARVEST_LOG";
