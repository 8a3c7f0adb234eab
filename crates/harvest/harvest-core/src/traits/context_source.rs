use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{ContextFieldKind, ContextRequest, FieldValue, Observed};

/// One upstream data service (weather, soil, history, preferences).
#[async_trait]
pub trait IContextSource: Send + Sync {
    /// The field this source fills.
    fn kind(&self) -> ContextFieldKind;

    /// Human-readable source name for the recommendation's source list.
    fn name(&self) -> &str;

    async fn fetch(&self, request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError>;
}
