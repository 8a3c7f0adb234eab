//! Record every degradation event: component, failure mode, fallback used, timestamp, recovery status.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use harvest_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

/// Recovery status of a degradation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// Still degraded.
    Active,
    /// A later request saw the component healthy again.
    Recovered,
}

/// A tracked degradation event with recovery status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// Tracks degradation events across requests for reporting.
///
/// Bounded: once `capacity` events are held, the oldest is dropped.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
    capacity: usize,
}

impl DegradationTracker {
    pub const DEFAULT_CAPACITY: usize = 1_024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Mark every active degradation of a component as recovered.
    pub fn mark_recovered(&mut self, component: &str) {
        let now = Utc::now();
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                tracked.recovered_at = Some(now);
            }
        }
    }

    /// All retained events, oldest first.
    pub fn events(&self) -> impl ExactSizeIterator<Item = &TrackedDegradation> + '_ {
        self.events.iter()
    }

    /// Get active (unrecovered) degradations.
    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Count events in the last N seconds for a given component.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::new()
    }
}
