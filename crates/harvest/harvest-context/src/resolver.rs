//! Layered context resolution: user input, then upstream source, then policy.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use harvest_core::config::ContextConfig;
use harvest_core::errors::{ContextError, HarvestResult, SourceError};
use harvest_core::models::{
    ContextField, ContextFieldKind, ContextRequest, DegradationAction, FieldValue, PolicySubject,
    RecommendationContext,
};
use harvest_core::traits::{IContextResolver, IContextSource, IDegradationPolicy};
use harvest_core::Intent;
use harvest_observability::tracing_setup::events;
use tracing::{debug, instrument};

use crate::caching::CachingSource;
use crate::regional_defaults::RegionalDefaults;

/// Resolves each context field independently.
///
/// Per field: a value the user supplied wins; otherwise the registered
/// source is asked under `source_timeout_ms`. Values older than the field's
/// max age are kept but flagged stale. For fields an intent's advisors read,
/// any degradation is handed to the policy, which may keep the field, swap in
/// the regional default, or fail the request.
pub struct LayeredContextResolver {
    sources: HashMap<ContextFieldKind, Arc<dyn IContextSource>>,
    policy: Arc<dyn IDegradationPolicy>,
    defaults: RegionalDefaults,
    config: ContextConfig,
}

impl LayeredContextResolver {
    pub fn new(policy: Arc<dyn IDegradationPolicy>, config: ContextConfig) -> Self {
        Self {
            sources: HashMap::new(),
            policy,
            defaults: RegionalDefaults::default(),
            config,
        }
    }

    /// Register the source for its field. A later source for the same field replaces the earlier one.
    pub fn with_source(mut self, source: Arc<dyn IContextSource>) -> Self {
        self.sources.insert(source.kind(), source);
        self
    }

    /// Register a source wrapped in a last-good-value cache sized from config.
    pub fn with_cached_source<S: IContextSource + 'static>(self, source: S) -> Self {
        let cached = CachingSource::new(source, self.config.cache_capacity, self.config.cache_ttl());
        self.with_source(Arc::new(cached))
    }

    pub fn with_regional_defaults(mut self, defaults: RegionalDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Name of the source registered for `kind`, if any.
    pub fn source_name(&self, kind: ContextFieldKind) -> Option<&str> {
        self.sources.get(&kind).map(|s| s.name())
    }

    async fn fetch_field(
        &self,
        kind: ContextFieldKind,
        request: &ContextRequest,
        now: DateTime<Utc>,
    ) -> ContextField<FieldValue> {
        if let Some(value) = request.supplied.get(kind) {
            return ContextField::user_input(value);
        }

        let Some(source) = self.sources.get(&kind) else {
            return ContextField::missing("no source configured");
        };

        let timeout = self.config.source_timeout();
        let fetched = match tokio::time::timeout(timeout, source.fetch(request)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                after_ms: self.config.source_timeout_ms,
            }),
        };

        let observed = match fetched {
            Ok(observed) => observed,
            Err(err) => {
                debug!(field = %kind, source = source.name(), error = %err, "source fetch failed");
                return ContextField::missing(format!("{}: {err}", source.name()));
            }
        };

        if observed.value.kind() != kind {
            return ContextField::missing(format!(
                "{} returned {} data",
                source.name(),
                observed.value.kind()
            ));
        }

        let observed_at = observed.observed_at;
        let field = match observed.cache_fallback {
            Some(failure) => ContextField::cached(
                observed.value,
                observed_at,
                format!("{} failed ({failure}); using last good value", source.name()),
            ),
            None => ContextField::fetched(observed.value, observed_at),
        };

        let age = now.signed_duration_since(observed_at);
        let max_age = self.config.max_age(kind);
        if age > max_age {
            let stale = format!(
                "observed at {}, older than {}s",
                observed_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                max_age.num_seconds()
            );
            let note = match &field.note {
                Some(prior) => format!("{prior}; {stale}"),
                None => stale,
            };
            field.mark_stale(note)
        } else {
            field
        }
    }

    /// Apply the policy to one degraded field the intent reads.
    fn apply_policy(
        &self,
        intent: &Intent,
        request: &ContextRequest,
        kind: ContextFieldKind,
        field: ContextField<FieldValue>,
    ) -> HarvestResult<ContextField<FieldValue>> {
        let action = self.policy.decide(intent, &PolicySubject::Field(kind))?;
        let note = field.note.clone().unwrap_or_else(|| "degraded".to_string());
        events::field_degraded(kind.as_str(), action.as_str(), &note);

        match action {
            DegradationAction::ProceedWithDisclaimer => Ok(field),
            DegradationAction::SubstituteRegionalDefault => {
                match self.defaults.get(&request.region, kind) {
                    Some(default) => Ok(ContextField::regional_default(
                        default,
                        format!("regional default for {} ({note})", request.region),
                    )),
                    None => {
                        let mut kept = field;
                        kept.note = Some(format!(
                            "{note}; no regional default for {}",
                            request.region
                        ));
                        Ok(kept)
                    }
                }
            }
            DegradationAction::FailRequest => Err(ContextError::MandatoryFieldUnavailable {
                field: kind,
                reason: note,
            }
            .into()),
        }
    }
}

#[async_trait]
impl IContextResolver for LayeredContextResolver {
    #[instrument(skip_all, fields(intent = %intent, region = %request.region))]
    async fn resolve(
        &self,
        intent: &Intent,
        request: &ContextRequest,
        relevant: &[ContextFieldKind],
    ) -> HarvestResult<RecommendationContext> {
        if request.region.trim().is_empty() {
            return Err(ContextError::InvalidRequest {
                reason: "region must not be empty".to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let (weather, soil, history, preferences) = tokio::join!(
            self.fetch_field(ContextFieldKind::Weather, request, now),
            self.fetch_field(ContextFieldKind::Soil, request, now),
            self.fetch_field(ContextFieldKind::CropHistory, request, now),
            self.fetch_field(ContextFieldKind::Preferences, request, now),
        );

        let mut context = RecommendationContext::bare(request, now);
        let fields = [
            (ContextFieldKind::Weather, weather),
            (ContextFieldKind::Soil, soil),
            (ContextFieldKind::CropHistory, history),
            (ContextFieldKind::Preferences, preferences),
        ];
        for (kind, field) in fields {
            let field = if field.is_degraded() && relevant.contains(&kind) {
                self.apply_policy(intent, request, kind, field)?
            } else {
                field
            };
            context.set_field(kind, field);
        }

        Ok(context)
    }
}
