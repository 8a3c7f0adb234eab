// Single source of truth for all default values.

// --- Dispatch ---
pub const DEFAULT_REQUEST_DEADLINE_MS: u64 = 10_000;
pub const DEFAULT_ADVISOR_TIMEOUT_CEILING_MS: u64 = 4_000;

// --- Aggregation ---
pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
pub const DEFAULT_CONFIDENCE_FLOOR: f64 = 0.1;
pub const DEFAULT_DEGRADATION_PENALTY: f64 = 0.8;

// --- Explanation ---
pub const DEFAULT_UNCERTAINTY_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MAX_FACTORS: usize = 8;

// --- Context ---
pub const DEFAULT_WEATHER_MAX_AGE_SECS: u64 = 6 * 3600; // 6 hours
pub const DEFAULT_SOIL_MAX_AGE_SECS: u64 = 365 * 86_400;
pub const DEFAULT_HISTORY_MAX_AGE_SECS: u64 = 730 * 86_400;
pub const DEFAULT_PREFERENCES_MAX_AGE_SECS: u64 = 365 * 86_400;
pub const DEFAULT_SOURCE_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 3600;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
