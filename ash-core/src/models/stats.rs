use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot returned by `GetStats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub discovery_enabled: bool,
    pub discoveries_today: u32,
    pub max_daily_discoveries: u32,
    pub min_confidence: f64,
    pub last_discovery_date: Option<DateTime<Utc>>,
    pub learning_adjustments_today: u32,
    pub max_learning_adjustments_per_day: u32,
    pub learning_confidence_threshold: f64,
    pub pending_suggestions: usize,
    pub nlp_degraded: bool,
    pub degradation_events: usize,
}
