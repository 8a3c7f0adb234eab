//! Aggregator: per-advisor outcomes → ranked suggestions + composite confidence.

pub mod confidence;
pub mod ranking;

use harvest_core::config::AggregationConfig;
use harvest_core::errors::{HarvestError, HarvestResult, MissingInput};
use harvest_core::models::{
    AdvisorId, AdvisorReport, DegradationAction, PartialFailure, PolicySubject, RankedSuggestion,
};
use harvest_core::traits::IDegradationPolicy;
use harvest_core::{Confidence, Intent};
use tracing::debug;

/// Result of merging one request's advisor outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub suggestions: Vec<RankedSuggestion>,
    pub confidence: Confidence,
    /// Advisors excluded from the merge, in registration order.
    pub lost: Vec<(AdvisorId, PartialFailure)>,
    /// Advisors whose result was kept despite a caveat (stale data).
    pub degraded: Vec<(AdvisorId, PartialFailure)>,
    /// Number of losses the confidence was penalised for.
    pub penalized: usize,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    /// Merge reports (in registration order) into one aggregate.
    ///
    /// A lost required advisor is put to the policy: `FailRequest` fails the
    /// whole request with `InsufficientData` and no partial list. Any other
    /// decision, and every optional loss, costs one degradation penalty.
    pub fn aggregate(
        &self,
        intent: &Intent,
        reports: &[AdvisorReport],
        policy: &dyn IDegradationPolicy,
    ) -> HarvestResult<Aggregate> {
        let mut lost = Vec::new();
        for report in reports {
            let AdvisorReport {
                advisor,
                required,
                outcome,
                ..
            } = report;
            let Some(failure) = outcome.failure().filter(|_| outcome.is_lost()) else {
                continue;
            };

            if *required {
                let action = policy.decide(intent, &PolicySubject::Advisor(advisor.clone()))?;
                if action == DegradationAction::FailRequest {
                    return Err(HarvestError::InsufficientData {
                        intent: intent.clone(),
                        missing: MissingInput::Advisor(advisor.clone()),
                        reason: failure.describe(),
                    });
                }
            }
            lost.push((advisor.clone(), failure.clone()));
        }

        let surviving: Vec<&AdvisorReport> =
            reports.iter().filter(|r| r.outcome.result().is_some()).collect();
        if surviving.is_empty() {
            let Some((advisor, failure)) = lost.into_iter().next() else {
                return Err(HarvestError::NoAdvisorsConfigured {
                    intent: intent.clone(),
                });
            };
            return Err(HarvestError::InsufficientData {
                intent: intent.clone(),
                missing: MissingInput::Advisor(advisor),
                reason: format!("no advisor produced a result; first loss: {}", failure.describe()),
            });
        }

        let degraded = surviving
            .iter()
            .filter_map(|r| {
                r.outcome
                    .failure()
                    .map(|failure| (r.advisor.clone(), failure.clone()))
            })
            .collect();

        let suggestions = ranking::rank(reports, self.config.max_suggestions);
        let weights: Vec<(f64, usize)> = surviving
            .iter()
            .filter_map(|r| r.outcome.result())
            .map(|result| (result.confidence, result.suggestions.len()))
            .collect();
        let penalized = lost.len();
        let confidence = confidence::composite(&weights, penalized, &self.config);

        debug!(
            intent = %intent,
            surviving = surviving.len(),
            lost = penalized,
            suggestions = suggestions.len(),
            confidence = confidence.value(),
            "aggregated advisor outcomes"
        );

        Ok(Aggregate {
            suggestions,
            confidence,
            lost,
            degraded,
            penalized,
        })
    }
}
