//! RecommendationEngine: the caller-facing entry point.
//!
//! resolve context → dispatch advisors → aggregate → explain, all under one
//! request deadline taken from `[dispatch]` config.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use harvest_core::config::HarvestConfig;
use harvest_core::errors::{
    ConfigurationError, ContextError, HarvestError, HarvestResult, MissingInput,
};
use harvest_core::models::{
    AdvisorId, AdvisorReport, ContextFieldKind, ContextRequest, DegradationEvent, FieldSource,
    Recommendation, RecommendationContext,
};
use harvest_core::traits::{IAdvisor, IContextResolver, IDegradationPolicy};
use harvest_core::Intent;
use harvest_observability::tracing_setup::events;
use harvest_observability::{
    aggregation_span, dispatch_span, request_span, resolve_span, DegradationTracker,
    TrackedDegradation,
};
use harvest_policy::ensure_total;
use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregation::Aggregator;
use crate::dispatch::Dispatcher;
use crate::explanation::ExplanationComposer;
use crate::registry::{self, AdvisorRegistry};

pub struct RecommendationEngine {
    config: HarvestConfig,
    registry: AdvisorRegistry,
    resolver: Arc<dyn IContextResolver>,
    policy: Arc<dyn IDegradationPolicy>,
    dispatcher: Dispatcher,
    aggregator: Aggregator,
    composer: ExplanationComposer,
    degradations: Mutex<DegradationTracker>,
}

impl RecommendationEngine {
    /// Validates the config. The engine starts with an empty registry;
    /// advisors are added through [`Self::register_advisor`].
    pub fn new(
        config: HarvestConfig,
        resolver: Arc<dyn IContextResolver>,
        policy: Arc<dyn IDegradationPolicy>,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;

        Ok(Self {
            dispatcher: Dispatcher::new(config.dispatch.clone()),
            aggregator: Aggregator::new(config.aggregation.clone()),
            composer: ExplanationComposer::new(config.explanation.clone()),
            degradations: Mutex::new(DegradationTracker::new()),
            config,
            registry: AdvisorRegistry::new(),
            resolver,
            policy,
        })
    }

    /// Bind an advisor to an intent once the policy covers what it adds.
    pub fn register_advisor(
        &self,
        intent: Intent,
        advisor: Arc<dyn IAdvisor>,
        required: bool,
    ) -> Result<(), ConfigurationError> {
        let added = registry::subjects_for(&intent, advisor.as_ref(), required);
        ensure_total(self.policy.as_ref(), &added)?;
        self.registry.register(intent, advisor, required)
    }

    pub fn deregister_advisor(&self, intent: &Intent, advisor: &AdvisorId) -> bool {
        self.registry.deregister(intent, advisor)
    }

    /// Read-only view of the bindings.
    pub fn registry(&self) -> &AdvisorRegistry {
        &self.registry
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Degradations seen across requests, oldest first.
    pub fn degradation_report(&self) -> Vec<TrackedDegradation> {
        self.degradations
            .lock()
            .map(|tracker| tracker.events().cloned().collect())
            .unwrap_or_default()
    }

    /// Components still degraded as of their most recent request.
    pub fn active_degradations(&self) -> Vec<TrackedDegradation> {
        self.degradations
            .lock()
            .map(|tracker| tracker.active_degradations().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Produce one recommendation, or fail with `NoAdvisorsConfigured`,
    /// `InsufficientData`, or `Timeout`.
    pub async fn generate_recommendation(
        &self,
        intent: &Intent,
        request: &ContextRequest,
    ) -> HarvestResult<Recommendation> {
        let span = request_span!(intent, request.region);
        let result = self.run(intent, request).instrument(span).await;
        if let Err(err) = &result {
            events::request_failed(intent.as_str(), err.kind(), &err.to_string());
        }
        result
    }

    async fn run(&self, intent: &Intent, request: &ContextRequest) -> HarvestResult<Recommendation> {
        let started = Instant::now();
        let deadline = started + self.config.dispatch.request_deadline();
        let timeout = || HarvestError::Timeout {
            intent: intent.clone(),
            deadline_ms: self.config.dispatch.request_deadline_ms,
        };

        let bindings = self.registry.capabilities_for(intent)?;
        ensure_total(
            self.policy.as_ref(),
            &registry::binding_subjects(intent, &bindings),
        )?;
        let relevant = registry::relevant_fields(&bindings);

        let context = tokio::time::timeout_at(
            deadline,
            self.resolver
                .resolve(intent, request, &relevant)
                .instrument(resolve_span!(intent)),
        )
        .await
        .map_err(|_| timeout())?
        .map_err(|err| mandatory_field_loss(intent, err))?;
        let context = Arc::new(context);

        let dispatched = self
            .dispatcher
            .dispatch(&bindings, Arc::clone(&context), deadline)
            .instrument(dispatch_span!(intent, bindings.len()))
            .await;

        if dispatched.deadline_expired && !dispatched.any_responded() {
            return Err(timeout());
        }

        let surviving = dispatched
            .reports
            .iter()
            .filter(|r| r.outcome.result().is_some())
            .count();
        let aggregate = {
            let _span = aggregation_span!(intent, surviving).entered();
            self.aggregator
                .aggregate(intent, &dispatched.reports, self.policy.as_ref())?
        };

        self.track(&context, &relevant, &dispatched.reports);

        let composition =
            self.composer
                .compose(intent, &context, &relevant, &dispatched.reports, &aggregate);

        let recommendation = Recommendation {
            id: Uuid::new_v4(),
            intent: intent.clone(),
            suggestions: aggregate.suggestions,
            confidence: aggregate.confidence,
            explanation: composition.explanation,
            disclaimer: composition.disclaimer,
            sources: composition.sources,
            created_at: Utc::now(),
        };

        events::recommendation_produced(
            intent.as_str(),
            recommendation.suggestions.len(),
            recommendation.confidence.value(),
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        );
        Ok(recommendation)
    }

    /// Record this request's degradations and recoveries.
    fn track(
        &self,
        context: &RecommendationContext,
        relevant: &[ContextFieldKind],
        reports: &[AdvisorReport],
    ) {
        let Ok(mut tracker) = self.degradations.lock() else {
            return;
        };

        for kind in relevant {
            let status = context.field_status(*kind);
            let component = format!("field:{kind}");
            if status.is_degraded() {
                let fallback = match status.source {
                    FieldSource::RegionalDefault => "regional default",
                    FieldSource::Cached => "last good value",
                    FieldSource::Missing => "proceeded without field",
                    FieldSource::UserInput | FieldSource::Fetched => "used stale value",
                };
                let failure = status.note.unwrap_or_else(|| "degraded".to_string());
                tracker.record(DegradationEvent::now(component, failure, fallback));
            } else {
                tracker.mark_recovered(&component);
            }
        }

        for report in reports {
            let component = format!("advisor:{}", report.advisor);
            match report.outcome.failure() {
                Some(failure) => {
                    let fallback = if report.outcome.is_lost() {
                        "excluded from aggregation"
                    } else {
                        "kept with caveat"
                    };
                    tracker.record(DegradationEvent::now(component, failure.describe(), fallback));
                }
                None => tracker.mark_recovered(&component),
            }
        }
    }
}

/// A field the policy marks mandatory is reported like a lost required advisor.
fn mandatory_field_loss(intent: &Intent, err: HarvestError) -> HarvestError {
    match err {
        HarvestError::Context(ContextError::MandatoryFieldUnavailable { field, reason }) => {
            HarvestError::InsufficientData {
                intent: intent.clone(),
                missing: MissingInput::ContextField(field),
                reason,
            }
        }
        other => other,
    }
}
