use harvest_core::models::{AdvisorId, FieldStatus, PartialFailure};
use harvest_core::Confidence;

use super::caveats::field_caveat;

/// Everything that makes the recommendation less certain than it looks.
pub fn uncertainties(
    confidence: Confidence,
    threshold: f64,
    fields: &[FieldStatus],
    lost: &[(AdvisorId, PartialFailure)],
    degraded: &[(AdvisorId, PartialFailure)],
    suggestion_count: usize,
) -> Vec<String> {
    let mut notes = Vec::new();

    if confidence.value() < threshold {
        notes.push(format!(
            "composite confidence {confidence} is below {threshold:.2}"
        ));
    }
    notes.extend(fields.iter().filter_map(field_caveat));
    for (advisor, failure) in lost {
        notes.push(format!("{advisor} did not contribute: {}", failure.describe()));
    }
    for (advisor, failure) in degraded {
        notes.push(format!("{advisor} result is {}", failure.describe()));
    }
    if suggestion_count == 0 {
        notes.push("no advisor produced a suggestion".to_string());
    }
    notes
}
