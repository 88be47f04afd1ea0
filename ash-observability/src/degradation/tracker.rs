//! Record degradation episodes: component, failure mode, fallback used,
//! timestamp, recovery status.
//!
//! Repeated failures of a component that is already degraded fold into its
//! active episode, and recovered episodes are kept up to [`MAX_TRACKED`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::tracing_setup::events;

/// Episodes retained per tracker, active ones included.
pub const MAX_TRACKED: usize = 256;

/// One observed failure of a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

/// One episode: the first failure, plus how often it recurred before recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
    pub occurrences: u32,
    pub last_failure: String,
    pub last_seen: DateTime<Utc>,
}

impl TrackedDegradation {
    fn is_active_for(&self, component: &str) -> bool {
        self.recovery_status == RecoveryStatus::Active && self.event.component == component
    }
}

/// Bounded degradation history. Callers serialize access.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an episode for `event.component`, or fold into the active one.
    pub fn record(&mut self, event: DegradationEvent) {
        if let Some(active) = self
            .events
            .iter_mut()
            .find(|t| t.is_active_for(&event.component))
        {
            active.occurrences = active.occurrences.saturating_add(1);
            active.last_failure = event.failure;
            active.last_seen = event.timestamp;
            return;
        }

        events::degradation_triggered(&event.component, &event.failure, &event.fallback_used);
        if self.events.len() >= MAX_TRACKED {
            self.evict_oldest_recovered();
        }
        self.events.push(TrackedDegradation {
            last_failure: event.failure.clone(),
            last_seen: event.timestamp,
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
            occurrences: 1,
        });
    }

    fn evict_oldest_recovered(&mut self) {
        if let Some(oldest) = self
            .events
            .iter()
            .position(|t| t.recovery_status == RecoveryStatus::Recovered)
        {
            self.events.remove(oldest);
        }
    }

    /// Close every active degradation of `component`. Returns how many were closed.
    pub fn mark_recovered(&mut self, component: &str, at: DateTime<Utc>) -> usize {
        let mut closed = 0;
        for tracked in self.events.iter_mut().filter(|t| t.is_active_for(component)) {
            tracked.recovery_status = RecoveryStatus::Recovered;
            tracked.recovered_at = Some(at);
            closed += 1;
        }
        if closed > 0 {
            events::degradation_recovered(component);
        }
        closed
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| t.is_active_for(component))
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Episodes of `component` with a failure newer than `now - window`.
    pub fn count_recent(&self, component: &str, window: Duration, now: DateTime<Utc>) -> usize {
        let cutoff = now - window;
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.last_seen > cutoff)
            .count()
    }

    /// How long `component` has been continuously degraded.
    pub fn degraded_duration(&self, component: &str, now: DateTime<Utc>) -> Option<Duration> {
        let earliest = self
            .events
            .iter()
            .filter(|t| t.is_active_for(component))
            .map(|t| t.event.timestamp)
            .min()?;
        Some(now - earliest)
    }
}
