//! Explanation composer: factors, uncertainties, disclaimer, and source list.
//!
//! Pure data assembly over the aggregate and the resolved context. Nothing
//! here performs I/O; prose rendering happens downstream.

mod caveats;
pub mod disclaimer;
pub mod factors;
pub mod sources;
pub mod uncertainty;

use harvest_core::config::ExplanationConfig;
use harvest_core::models::{
    AdvisorReport, ContextFieldKind, DataSource, Explanation, FieldStatus, RecommendationContext,
};
use harvest_core::Intent;

use crate::aggregation::Aggregate;

/// Everything the composer attaches to a recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub explanation: Explanation,
    pub disclaimer: Option<String>,
    pub sources: Vec<DataSource>,
}

#[derive(Debug, Clone)]
pub struct ExplanationComposer {
    config: ExplanationConfig,
}

impl ExplanationComposer {
    pub fn new(config: ExplanationConfig) -> Self {
        Self { config }
    }

    /// Only the `relevant` fields (those the intent's advisors read) are
    /// reported on.
    pub fn compose(
        &self,
        intent: &Intent,
        context: &RecommendationContext,
        relevant: &[ContextFieldKind],
        reports: &[AdvisorReport],
        aggregate: &Aggregate,
    ) -> Composition {
        let fields: Vec<FieldStatus> = relevant
            .iter()
            .map(|kind| context.field_status(*kind))
            .collect();

        let explanation = Explanation {
            summary: summary(intent, context, reports, aggregate),
            key_factors: factors::key_factors(reports, self.config.max_factors),
            uncertainties: uncertainty::uncertainties(
                aggregate.confidence,
                self.config.uncertainty_threshold,
                &fields,
                &aggregate.lost,
                &aggregate.degraded,
                aggregate.suggestions.len(),
            ),
        };

        Composition {
            explanation,
            disclaimer: disclaimer::disclaimer(&fields, &aggregate.lost),
            sources: sources::sources(&fields, reports),
        }
    }
}

/// One-paragraph placeholder the downstream renderer rewrites into prose.
fn summary(
    intent: &Intent,
    context: &RecommendationContext,
    reports: &[AdvisorReport],
    aggregate: &Aggregate,
) -> String {
    let contributed = reports.iter().filter(|r| r.outcome.result().is_some()).count();
    let lead = match aggregate.suggestions.first() {
        Some(top) => format!(
            "{} suggestion(s) for {intent} in {} ({} season), led by '{}'.",
            aggregate.suggestions.len(),
            context.region,
            context.season,
            top.suggestion.title
        ),
        None => format!(
            "No suggestions for {intent} in {} ({} season).",
            context.region, context.season
        ),
    };
    format!(
        "{lead} {contributed} of {} advisor(s) contributed; composite confidence {}.",
        reports.len(),
        aggregate.confidence
    )
}
