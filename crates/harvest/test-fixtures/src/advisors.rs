//! Advisors whose behaviour is fixed up front.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorId, AdvisorResult, ContextFieldKind, RecommendationContext, Suggestion,
};
use harvest_core::traits::IAdvisor;
use harvest_core::{Cancellable, CancellationToken};

#[derive(Debug, Clone)]
enum Script {
    Succeed(AdvisorResult),
    Fail(AdvisorError),
    Panic,
    /// Sleep until cancelled, then report `Cancelled`.
    Hang,
}

/// Test advisor that returns a scripted outcome after an optional delay.
#[derive(Debug, Clone)]
pub struct ScriptedAdvisor {
    id: AdvisorId,
    fields: Vec<ContextFieldKind>,
    script: Script,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<RecommendationContext>>>,
}

impl ScriptedAdvisor {
    fn with_script(id: &str, script: Script) -> Self {
        Self {
            id: AdvisorId::new(id),
            fields: Vec::new(),
            script,
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn returning(id: &str, result: AdvisorResult) -> Self {
        Self::with_script(id, Script::Succeed(result))
    }

    pub fn failing(id: &str, error: AdvisorError) -> Self {
        Self::with_script(id, Script::Fail(error))
    }

    pub fn panicking(id: &str) -> Self {
        Self::with_script(id, Script::Panic)
    }

    pub fn hanging(id: &str) -> Self {
        Self::with_script(id, Script::Hang)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn reading(mut self, fields: &[ContextFieldKind]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    /// Number of times `invoke` has been entered. Shared across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Contexts this advisor (or any clone) was invoked with.
    pub fn seen_contexts(&self) -> Vec<RecommendationContext> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl IAdvisor for ScriptedAdvisor {
    fn id(&self) -> &AdvisorId {
        &self.id
    }

    fn relevant_fields(&self) -> &[ContextFieldKind] {
        &self.fields
    }

    async fn invoke(
        &self,
        context: &RecommendationContext,
        cancel: &CancellationToken,
    ) -> Result<AdvisorResult, AdvisorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(context.clone());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.script {
            Script::Succeed(result) => Ok(result.clone()),
            Script::Fail(error) => Err(error.clone()),
            Script::Panic => panic!("scripted advisor {} panicked", self.id),
            Script::Hang => {
                while !cancel.is_cancelled() {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
                Err(AdvisorError::Cancelled)
            }
        }
    }
}

/// Build a result from `(title, suitability)` pairs.
pub fn result_with(suggestions: &[(&str, f64)], confidence: f64) -> AdvisorResult {
    AdvisorResult::new(
        suggestions
            .iter()
            .map(|(title, suitability)| Suggestion::new(*title, format!("{title} suggestion"), *suitability))
            .collect(),
        confidence,
    )
}
