//! Human-readable caveats shared by uncertainties and the disclaimer.

use harvest_core::models::{FieldSource, FieldStatus};

/// Describe a degraded field, or `None` if it is fresh.
pub fn field_caveat(status: &FieldStatus) -> Option<String> {
    let note = status.note.as_deref().unwrap_or("no detail");
    let kind = status.kind;
    match status.source {
        FieldSource::Missing => Some(format!("{kind} data missing ({note})")),
        FieldSource::RegionalDefault => {
            Some(format!("{kind} estimated from regional defaults ({note})"))
        }
        FieldSource::Cached => Some(format!("{kind} served from cache ({note})")),
        FieldSource::UserInput | FieldSource::Fetched if status.stale => {
            Some(format!("{kind} data is stale ({note})"))
        }
        FieldSource::UserInput | FieldSource::Fetched => None,
    }
}
