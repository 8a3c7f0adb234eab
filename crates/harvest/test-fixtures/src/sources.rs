//! Context sources with fixed behaviour.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use harvest_core::errors::SourceError;
use harvest_core::models::{ContextFieldKind, ContextRequest, FieldValue, Observed};
use harvest_core::traits::IContextSource;

/// Always returns the same value with the given observation time.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    value: FieldValue,
    observed_at: Option<DateTime<Utc>>,
}

impl StaticSource {
    /// Value observed at fetch time.
    pub fn new(name: &str, value: FieldValue) -> Self {
        Self {
            name: name.to_string(),
            value,
            observed_at: None,
        }
    }

    pub fn observed_at(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }
}

#[async_trait]
impl IContextSource for StaticSource {
    fn kind(&self) -> ContextFieldKind {
        self.value.kind()
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError> {
        Ok(Observed::new(
            self.value.clone(),
            self.observed_at.unwrap_or_else(Utc::now),
        ))
    }
}

/// Always fails with the given error.
#[derive(Debug, Clone)]
pub struct FailingSource {
    kind: ContextFieldKind,
    name: String,
    error: SourceError,
}

impl FailingSource {
    pub fn new(kind: ContextFieldKind, name: &str, error: SourceError) -> Self {
        Self {
            kind,
            name: name.to_string(),
            error,
        }
    }

    pub fn unavailable(kind: ContextFieldKind, name: &str) -> Self {
        Self::new(
            kind,
            name,
            SourceError::Unavailable {
                reason: "connection refused".to_string(),
            },
        )
    }
}

#[async_trait]
impl IContextSource for FailingSource {
    fn kind(&self) -> ContextFieldKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError> {
        Err(self.error.clone())
    }
}

/// Answers after a delay. Used to exercise source timeouts.
#[derive(Debug, Clone)]
pub struct SlowSource {
    inner: StaticSource,
    delay: Duration,
}

impl SlowSource {
    pub fn new(inner: StaticSource, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl IContextSource for SlowSource {
    fn kind(&self) -> ContextFieldKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch(request).await
    }
}

/// Healthy until `go_down` is called; clones share the switch.
#[derive(Debug, Clone)]
pub struct ToggleSource {
    inner: StaticSource,
    down: Arc<AtomicBool>,
}

impl ToggleSource {
    pub fn new(inner: StaticSource) -> Self {
        Self {
            inner,
            down: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl IContextSource for ToggleSource {
    fn kind(&self) -> ContextFieldKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn fetch(&self, request: &ContextRequest) -> Result<Observed<FieldValue>, SourceError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(SourceError::Unavailable {
                reason: "upstream down".to_string(),
            });
        }
        self.inner.fetch(request).await
    }
}
