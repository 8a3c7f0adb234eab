//! Helpers shared by the rule-based advisors.

use harvest_core::models::{ContextFieldKind, RecommendationContext};

/// 1.0 inside `[min, max]`, falling linearly to 0.0 at `tolerance` outside.
pub fn range_fit(value: f64, min: f64, max: f64, tolerance: f64) -> f64 {
    let distance = if value < min {
        min - value
    } else if value > max {
        value - max
    } else {
        0.0
    };
    if tolerance <= 0.0 {
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - distance / tolerance).clamp(0.0, 1.0)
}

/// Start from `base` and lose `step` for every degraded field in `fields`.
pub fn field_confidence(
    context: &RecommendationContext,
    fields: &[ContextFieldKind],
    base: f64,
    step: f64,
) -> f64 {
    let degraded = fields
        .iter()
        .filter(|kind| context.field_status(**kind).is_degraded())
        .count();
    (base - step * degraded as f64).clamp(0.2, 1.0)
}

/// Stale-data reason covering every stale field in `fields`, if any.
pub fn stale_reason(context: &RecommendationContext, fields: &[ContextFieldKind]) -> Option<String> {
    let stale: Vec<&str> = fields
        .iter()
        .filter(|kind| context.field_status(**kind).stale)
        .map(|kind| kind.as_str())
        .collect();
    (!stale.is_empty()).then(|| format!("stale {} data", stale.join(", ")))
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
