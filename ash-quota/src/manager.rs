//! QuotaManager: atomic check-and-increment over the daily counters.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ash_core::config::EngineConfig;
use ash_core::{AshError, AshResult, Clock};
use ash_observability::tracing_setup::events;
use chrono::{DateTime, Utc};

use crate::counters::{DailyCounters, QuotaCounter, QuotaStatus};

/// Per-counter daily maxima.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaLimits {
    pub max_daily_discoveries: u32,
    pub max_learning_adjustments_per_day: u32,
}

impl QuotaLimits {
    pub fn get(&self, counter: QuotaCounter) -> u32 {
        match counter {
            QuotaCounter::Discoveries => self.max_daily_discoveries,
            QuotaCounter::LearningAdjustments => self.max_learning_adjustments_per_day,
        }
    }
}

impl From<&EngineConfig> for QuotaLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            max_daily_discoveries: config.max_daily_discoveries,
            max_learning_adjustments_per_day: config.max_learning_adjustments_per_day,
        }
    }
}

struct QuotaState {
    counters: DailyCounters,
    limits: QuotaLimits,
}

/// Thread-safe daily counters. Reset is lazy: every access first rolls the
/// window over if the UTC date has advanced.
pub struct QuotaManager {
    clock: Arc<dyn Clock>,
    state: Mutex<QuotaState>,
}

impl QuotaManager {
    pub fn new(clock: Arc<dyn Clock>, limits: QuotaLimits) -> Self {
        let counters = DailyCounters::new(clock.now());
        Self {
            clock,
            state: Mutex::new(QuotaState { counters, limits }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QuotaState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock and roll over if the window expired.
    fn lock_current(&self) -> (MutexGuard<'_, QuotaState>, DateTime<Utc>) {
        let now = self.clock.now();
        let mut state = self.lock();
        roll_over_if_expired(&mut state.counters, now);
        (state, now)
    }

    /// Atomically take one unit of `counter` if any remains today.
    pub fn try_reserve(&self, counter: QuotaCounter) -> bool {
        let (mut state, now) = self.lock_current();
        let limit = state.limits.get(counter);
        let used = state.counters.get(counter);
        if used >= limit {
            events::quota_exhausted(counter.as_str(), used, limit);
            return false;
        }
        state.counters.increment(counter, now);
        true
    }

    /// [`try_reserve`](Self::try_reserve), failing with `QuotaExceeded`.
    pub fn reserve(&self, counter: QuotaCounter) -> AshResult<()> {
        if self.try_reserve(counter) {
            Ok(())
        } else {
            Err(self.exceeded(counter))
        }
    }

    /// Build the `QuotaExceeded` error for the counter's current usage.
    pub fn exceeded(&self, counter: QuotaCounter) -> AshError {
        let (state, _) = self.lock_current();
        AshError::QuotaExceeded {
            counter: counter.as_str().to_string(),
            used: state.counters.get(counter),
            limit: state.limits.get(counter),
        }
    }

    pub fn current_count(&self, counter: QuotaCounter) -> u32 {
        let (state, _) = self.lock_current();
        state.counters.get(counter)
    }

    pub fn status(&self, counter: QuotaCounter) -> QuotaStatus {
        let (state, _) = self.lock_current();
        if state.counters.get(counter) >= state.limits.get(counter) {
            QuotaStatus::Exhausted
        } else {
            QuotaStatus::Open
        }
    }

    /// Roll the window over if the UTC day has changed. Returns whether it did.
    pub fn reset_if_expired(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.lock();
        roll_over_if_expired(&mut state.counters, now)
    }

    /// Replace the limits. Takes effect for the next reservation; units
    /// already reserved today are kept.
    pub fn set_limits(&self, limits: QuotaLimits) {
        self.lock().limits = limits;
    }

    pub fn limits(&self) -> QuotaLimits {
        self.lock().limits
    }

    /// Consistent copy of the counters.
    pub fn snapshot(&self) -> DailyCounters {
        let (state, _) = self.lock_current();
        state.counters.clone()
    }
}

fn roll_over_if_expired(counters: &mut DailyCounters, now: DateTime<Utc>) -> bool {
    if !counters.is_expired(now) {
        return false;
    }
    events::quota_window_rolled_over(
        &counters.window_start.to_rfc3339(),
        counters.discoveries_today,
        counters.learning_adjustments_today,
    );
    counters.roll_over(now);
    true
}
