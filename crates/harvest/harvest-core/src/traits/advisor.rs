use async_trait::async_trait;

use crate::cancellation::CancellationToken;
use crate::errors::AdvisorError;
use crate::models::{AdvisorId, AdvisorResult, ContextFieldKind, RecommendationContext};

/// A pluggable advisor capability.
///
/// Implementations must be safe to invoke concurrently and keep no state
/// between calls: a call abandoned at the deadline may still finish later and
/// its result is discarded.
#[async_trait]
pub trait IAdvisor: Send + Sync {
    /// Stable identity, used for ranking tie-breaks and source listing.
    fn id(&self) -> &AdvisorId;

    /// Context fields this advisor reads. Drives degradation policy coverage.
    fn relevant_fields(&self) -> &[ContextFieldKind];

    /// Produce suggestions for the given context.
    async fn invoke(
        &self,
        context: &RecommendationContext,
        cancel: &CancellationToken,
    ) -> Result<AdvisorResult, AdvisorError>;
}
