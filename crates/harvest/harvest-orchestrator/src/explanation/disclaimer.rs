use harvest_core::models::{AdvisorId, FieldSource, FieldStatus, PartialFailure};

use super::caveats::field_caveat;

/// User-facing disclaimer naming every missing advisor and every missing or
/// substituted input. `None` when nothing was lost or substituted.
pub fn disclaimer(
    fields: &[FieldStatus],
    lost: &[(AdvisorId, PartialFailure)],
) -> Option<String> {
    let mut parts: Vec<String> = lost
        .iter()
        .map(|(advisor, failure)| format!("{advisor} data unavailable ({})", failure.describe()))
        .collect();

    parts.extend(
        fields
            .iter()
            .filter(|s| matches!(s.source, FieldSource::Missing | FieldSource::RegionalDefault))
            .filter_map(field_caveat),
    );

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
