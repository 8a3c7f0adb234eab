use async_trait::async_trait;

use crate::errors::HarvestResult;
use crate::intent::Intent;
use crate::models::{ContextFieldKind, ContextRequest, RecommendationContext};

/// Resolves the request context from external data services.
///
/// Resolution is non-atomic: a failed sub-fetch yields a `Missing` (or
/// substituted) field rather than an error, unless the degradation policy
/// marks that field mandatory for the intent.
#[async_trait]
pub trait IContextResolver: Send + Sync {
    /// `relevant` lists the fields the intent's advisors read; policy decisions
    /// are only taken for those.
    async fn resolve(
        &self,
        intent: &Intent,
        request: &ContextRequest,
        relevant: &[ContextFieldKind],
    ) -> HarvestResult<RecommendationContext>;
}
