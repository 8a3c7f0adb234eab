//! A resolver that hands back a prepared context.

use async_trait::async_trait;
use harvest_core::errors::HarvestResult;
use harvest_core::models::{ContextFieldKind, ContextRequest, RecommendationContext};
use harvest_core::traits::IContextResolver;
use harvest_core::Intent;

/// Returns `context` re-labelled with the request's user, region and season.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    context: RecommendationContext,
}

impl FixedResolver {
    pub fn new(context: RecommendationContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl IContextResolver for FixedResolver {
    async fn resolve(
        &self,
        _intent: &Intent,
        request: &ContextRequest,
        _relevant: &[ContextFieldKind],
    ) -> HarvestResult<RecommendationContext> {
        let mut context = self.context.clone();
        context.user_id = request.user_id.clone();
        context.region = request.region.clone();
        context.season = request.season;
        Ok(context)
    }
}
