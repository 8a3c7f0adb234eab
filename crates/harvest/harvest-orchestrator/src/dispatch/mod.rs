//! Concurrent fan-out of one context to every advisor bound to an intent.

mod classify;

use std::sync::Arc;
use std::time::Duration;

use harvest_core::config::DispatchConfig;
use harvest_core::models::{AdvisorOutcome, AdvisorReport, PartialFailure, RecommendationContext};
use harvest_core::{Cancellable, CancellationToken};
use harvest_observability::tracing_setup::events;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::Instant;
use tracing::warn;

use crate::registry::AdvisorBinding;

/// Per-advisor reports plus whether the request deadline cut dispatch short.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// One report per binding, in registration order.
    pub reports: Vec<AdvisorReport>,
    pub deadline_expired: bool,
    pub elapsed_ms: u64,
}

impl DispatchOutcome {
    /// True if at least one advisor produced anything other than a timeout.
    pub fn any_responded(&self) -> bool {
        self.reports.iter().any(|r| r.outcome.responded())
    }
}

/// Aborts the wrapped advisor task when dropped.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs advisors concurrently under a per-advisor ceiling and a request deadline.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Invoke every binding with the shared read-only context.
    ///
    /// Each advisor runs in its own task and gets `min(remaining, ceiling)`.
    /// When `deadline` passes, advisors still pending are recorded as timed
    /// out, the cancellation token is signalled, and their tasks are aborted
    /// without waiting for them to acknowledge.
    pub async fn dispatch(
        &self,
        bindings: &[AdvisorBinding],
        context: Arc<RecommendationContext>,
        deadline: Instant,
    ) -> DispatchOutcome {
        let started = Instant::now();
        let cancel = CancellationToken::new();
        let ceiling = self.config.advisor_timeout_ceiling();
        let mut slots: Vec<Option<(AdvisorOutcome, u64)>> = vec![None; bindings.len()];
        let mut tasks = JoinSet::new();

        for (order, binding) in bindings.iter().enumerate() {
            let budget = deadline.saturating_duration_since(Instant::now()).min(ceiling);
            let advisor = Arc::clone(&binding.advisor);
            let context = Arc::clone(&context);
            let token = cancel.clone();

            tasks.spawn(async move {
                let invoked = Instant::now();
                let mut handle =
                    tokio::spawn(async move { advisor.invoke(&context, &token).await });
                let _guard = AbortOnDrop(handle.abort_handle());
                let joined = tokio::time::timeout(budget, &mut handle).await;
                let outcome = classify::outcome(joined, budget);
                (order, outcome, millis(invoked.elapsed()))
            });
        }

        let expiry = tokio::time::sleep_until(deadline);
        tokio::pin!(expiry);
        let mut deadline_expired = false;

        loop {
            tokio::select! {
                biased;
                joined = tasks.join_next() => match joined {
                    Some(Ok((order, outcome, elapsed_ms))) => {
                        slots[order] = Some((outcome, elapsed_ms));
                    }
                    Some(Err(err)) => warn!(error = %err, "advisor supervisor task failed"),
                    None => break,
                },
                _ = &mut expiry => {
                    deadline_expired = true;
                    break;
                }
            }
        }

        if deadline_expired {
            cancel.cancel();
            tasks.abort_all();
        }
        // A per-advisor budget clipped to the deadline can fire just before the deadline timer.
        let deadline_expired = deadline_expired
            || (Instant::now() >= deadline
                && slots.iter().flatten().any(|(outcome, _)| {
                    outcome.failure().is_some_and(PartialFailure::is_timeout)
                }));

        let elapsed_ms = millis(started.elapsed());
        let reports = bindings
            .iter()
            .zip(slots)
            .enumerate()
            .map(|(order, (binding, slot))| {
                let (outcome, elapsed) = slot.unwrap_or_else(|| {
                    let failure = if deadline_expired {
                        PartialFailure::Timeout {
                            after_ms: elapsed_ms,
                        }
                    } else {
                        PartialFailure::error(
                            harvest_core::models::AdvisorErrorKind::Internal,
                            "advisor task ended without a result",
                        )
                    };
                    (AdvisorOutcome::Failed { failure }, elapsed_ms)
                });
                log_outcome(binding, &outcome, elapsed);
                AdvisorReport {
                    advisor: binding.id().clone(),
                    order,
                    required: binding.required,
                    outcome,
                    elapsed_ms: elapsed,
                }
            })
            .collect();

        DispatchOutcome {
            reports,
            deadline_expired,
            elapsed_ms,
        }
    }
}

fn log_outcome(binding: &AdvisorBinding, outcome: &AdvisorOutcome, elapsed_ms: u64) {
    match outcome {
        AdvisorOutcome::Completed { result } => events::advisor_completed(
            binding.id().as_str(),
            result.suggestions.len(),
            result.confidence,
            elapsed_ms,
        ),
        AdvisorOutcome::Degraded { failure, .. } | AdvisorOutcome::Failed { failure } => {
            events::advisor_failed(binding.id().as_str(), binding.required, &failure.describe())
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
