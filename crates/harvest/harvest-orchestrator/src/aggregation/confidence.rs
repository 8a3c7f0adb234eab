//! Composite confidence of a merged recommendation.

use harvest_core::config::AggregationConfig;
use harvest_core::Confidence;

/// Multiplier applied for `lost` advisors: `penalty ^ lost`.
pub fn penalty_multiplier(penalty: f64, lost: usize) -> f64 {
    penalty.powi(i32::try_from(lost).unwrap_or(i32::MAX))
}

/// Weighted mean of surviving advisor confidences, scaled down per lost
/// advisor and clamped into `[confidence_floor, 1.0]`.
///
/// `surviving` holds `(advisor confidence, suggestions contributed)`. When
/// no advisor contributed any suggestion the plain mean is used instead.
pub fn composite(surviving: &[(f64, usize)], lost: usize, config: &AggregationConfig) -> Confidence {
    let total_weight: usize = surviving.iter().map(|(_, count)| count).sum();
    let mean = if surviving.is_empty() {
        0.0
    } else if total_weight == 0 {
        surviving.iter().map(|(c, _)| c).sum::<f64>() / surviving.len() as f64
    } else {
        surviving
            .iter()
            .map(|(c, count)| c * *count as f64)
            .sum::<f64>()
            / total_weight as f64
    };

    let multiplier = penalty_multiplier(config.degradation_penalty, lost);
    Confidence::new(mean * multiplier).with_floor(config.confidence_floor)
}
