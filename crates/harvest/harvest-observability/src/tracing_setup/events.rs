//! Structured log events for key request operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log an advisor that returned a usable result.
pub fn advisor_completed(advisor: &str, suggestions: usize, confidence: f64, elapsed_ms: u64) {
    tracing::debug!(
        event = "advisor_completed",
        advisor = %advisor,
        suggestions = suggestions,
        confidence = confidence,
        elapsed_ms = elapsed_ms,
        "advisor completed"
    );
}

/// Log an advisor that timed out, errored, or returned degraded output.
pub fn advisor_failed(advisor: &str, required: bool, failure: &str) {
    tracing::warn!(
        event = "advisor_failed",
        advisor = %advisor,
        required = required,
        failure = %failure,
        "advisor failed"
    );
}

/// Log a context field that was missing, stale, or substituted.
pub fn field_degraded(field: &str, action: &str, note: &str) {
    tracing::info!(
        event = "field_degraded",
        field = %field,
        action = %action,
        note = %note,
        "context field degraded"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a request that failed with a typed error.
pub fn request_failed(intent: &str, kind: &str, message: &str) {
    tracing::warn!(
        event = "request_failed",
        intent = %intent,
        kind = %kind,
        message = %message,
        "recommendation request failed"
    );
}

/// Log a completed recommendation.
pub fn recommendation_produced(intent: &str, suggestions: usize, confidence: f64, elapsed_ms: u64) {
    tracing::info!(
        event = "recommendation_produced",
        intent = %intent,
        suggestions = suggestions,
        confidence = confidence,
        elapsed_ms = elapsed_ms,
        "recommendation produced"
    );
}
