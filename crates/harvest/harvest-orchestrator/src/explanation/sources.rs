use harvest_core::models::{
    AdvisorOutcome, AdvisorReport, DataSource, FieldSource, FieldStatus, Freshness, SourceKind,
};

/// Context fields first (in field order), then advisors (in registration order).
pub fn sources(fields: &[FieldStatus], reports: &[AdvisorReport]) -> Vec<DataSource> {
    let context = fields.iter().map(|status| DataSource {
        name: status.kind.as_str().to_string(),
        kind: SourceKind::Context(status.kind),
        freshness: field_freshness(status),
        observed_at: status.observed_at,
        note: status.note.clone(),
    });

    let advisors = reports.iter().map(|report| {
        let (freshness, note) = match &report.outcome {
            AdvisorOutcome::Completed { .. } => (Freshness::Fresh, None),
            AdvisorOutcome::Degraded { failure, .. } => (Freshness::Stale, Some(failure.describe())),
            AdvisorOutcome::Failed { failure } => (Freshness::Unavailable, Some(failure.describe())),
        };
        DataSource {
            name: report.advisor.to_string(),
            kind: SourceKind::Advisor(report.advisor.clone()),
            freshness,
            observed_at: None,
            note,
        }
    });

    context.chain(advisors).collect()
}

fn field_freshness(status: &FieldStatus) -> Freshness {
    match status.source {
        FieldSource::Missing => Freshness::Missing,
        FieldSource::RegionalDefault => Freshness::RegionalDefault,
        FieldSource::Cached => Freshness::Cached,
        _ if status.stale => Freshness::Stale,
        FieldSource::UserInput => Freshness::UserInput,
        FieldSource::Fetched => Freshness::Fresh,
    }
}
