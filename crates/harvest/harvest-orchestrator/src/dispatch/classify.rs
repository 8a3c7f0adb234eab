//! Map the raw result of one advisor task onto an `AdvisorOutcome`.

use std::any::Any;
use std::time::Duration;

use harvest_core::errors::AdvisorError;
use harvest_core::models::{
    AdvisorErrorKind, AdvisorOutcome, AdvisorResult, DataFreshness, PartialFailure,
};
use tokio::task::JoinError;
use tokio::time::error::Elapsed;

type Joined = Result<Result<Result<AdvisorResult, AdvisorError>, JoinError>, Elapsed>;

pub(super) fn outcome(joined: Joined, budget: Duration) -> AdvisorOutcome {
    let failed = |failure| AdvisorOutcome::Failed { failure };
    match joined {
        Err(_) => failed(PartialFailure::Timeout {
            after_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        }),
        Ok(Err(join_error)) => failed(join_failure(join_error)),
        Ok(Ok(Err(error))) => failed(PartialFailure::error(error.kind(), error.to_string())),
        Ok(Ok(Ok(result))) => accept(result),
    }
}

/// Validate a returned result; stale data is kept but flagged.
fn accept(result: AdvisorResult) -> AdvisorOutcome {
    if let Err(reason) = result.validate() {
        return AdvisorOutcome::Failed {
            failure: PartialFailure::error(AdvisorErrorKind::InvalidOutput, reason),
        };
    }
    match &result.freshness {
        DataFreshness::Fresh => AdvisorOutcome::Completed { result },
        DataFreshness::Stale { reason } => {
            let failure = PartialFailure::Degraded {
                reason: reason.clone(),
            };
            AdvisorOutcome::Degraded { result, failure }
        }
    }
}

fn join_failure(error: JoinError) -> PartialFailure {
    match error.try_into_panic() {
        Ok(payload) => {
            PartialFailure::error(AdvisorErrorKind::Panicked, panic_message(payload.as_ref()))
        }
        Err(_) => PartialFailure::error(AdvisorErrorKind::Cancelled, "advisor task was cancelled"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "advisor panicked".to_string()
    }
}
