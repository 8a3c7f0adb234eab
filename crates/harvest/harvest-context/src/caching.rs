//! Last-good-value fallback for flaky upstream sources.

use async_trait::async_trait;
use harvest_core::errors::SourceError;
use harvest_core::models::{ContextFieldKind, ContextRequest, FieldValue, Observed};
use harvest_core::traits::IContextSource;
use moka::sync::Cache;
use tracing::debug;

/// Wraps a source and remembers its last good value per (user, region).
///
/// Successful fetches pass through untouched. When the upstream fails and a
/// remembered value exists, that value is returned marked as a cache fallback
/// so the resolver records the field as `Cached`.
pub struct CachingSource<S> {
    inner: S,
    cache: Cache<String, Observed<FieldValue>>,
}

impl<S: IContextSource> CachingSource<S> {
    pub fn new(inner: S, capacity: u64, ttl: std::time::Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    fn key(request: &ContextRequest) -> String {
        format!("{}\u{1f}{}", request.user_id, request.region)
    }
}

#[async_trait]
impl<S: IContextSource> IContextSource for CachingSource<S> {
    fn kind(&self) -> ContextFieldKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError> {
        let key = Self::key(request);
        match self.inner.fetch(request).await {
            Ok(observed) => {
                self.cache.insert(key, observed.clone());
                Ok(observed)
            }
            Err(err) => match self.cache.get(&key) {
                Some(last_good) => {
                    debug!(source = self.inner.name(), error = %err, "serving cached value");
                    Ok(last_good.from_cache(err.to_string()))
                }
                None => Err(err),
            },
        }
    }
}
