use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named daily counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaCounter {
    Discoveries,
    LearningAdjustments,
}

impl QuotaCounter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discoveries => "discoveries",
            Self::LearningAdjustments => "learning_adjustments",
        }
    }
}

impl fmt::Display for QuotaCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Open` while count < max, `Exhausted` at max until the day rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaStatus {
    Open,
    Exhausted,
}

/// Counts for the current UTC day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCounters {
    pub discoveries_today: u32,
    pub learning_adjustments_today: u32,
    /// Always the start of a UTC day.
    pub window_start: DateTime<Utc>,
    /// Survives rollover; reported by stats.
    pub last_discovery_at: Option<DateTime<Utc>>,
}

impl DailyCounters {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            discoveries_today: 0,
            learning_adjustments_today: 0,
            window_start: start_of_utc_day(now),
            last_discovery_at: None,
        }
    }

    pub fn get(&self, counter: QuotaCounter) -> u32 {
        match counter {
            QuotaCounter::Discoveries => self.discoveries_today,
            QuotaCounter::LearningAdjustments => self.learning_adjustments_today,
        }
    }

    pub(crate) fn increment(&mut self, counter: QuotaCounter, now: DateTime<Utc>) {
        match counter {
            QuotaCounter::Discoveries => {
                self.discoveries_today += 1;
                self.last_discovery_at = Some(now);
            }
            QuotaCounter::LearningAdjustments => self.learning_adjustments_today += 1,
        }
    }

    /// True once `now` falls on a later UTC day than the window.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        start_of_utc_day(now) > self.window_start
    }

    pub(crate) fn roll_over(&mut self, now: DateTime<Utc>) {
        self.discoveries_today = 0;
        self.learning_adjustments_today = 0;
        self.window_start = start_of_utc_day(now);
    }
}

/// Midnight UTC of the day containing `at`.
pub fn start_of_utc_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}
