use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CrisisLevel;

/// Direction of a reviewer's correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    FalsePositive,
    FalseNegative,
}

impl AdjustmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FalsePositive => "false_positive",
            Self::FalseNegative => "false_negative",
        }
    }
}

/// A reviewer's false-positive / false-negative report as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub detected_level: CrisisLevel,
    pub correct_level: CrisisLevel,
    pub confidence: f64,
    pub reporter_id: String,
    /// Team override: bypasses the confidence threshold, never the quota.
    #[serde(default)]
    pub threshold_override: bool,
}

impl FeedbackReport {
    pub fn new(
        detected_level: CrisisLevel,
        correct_level: CrisisLevel,
        confidence: f64,
        reporter_id: impl Into<String>,
    ) -> Self {
        Self {
            detected_level,
            correct_level,
            confidence,
            reporter_id: reporter_id.into(),
            threshold_override: false,
        }
    }

    pub fn with_threshold_override(mut self) -> Self {
        self.threshold_override = true;
        self
    }

    /// The sensitivity class a report of this kind adjusts: the level that was
    /// wrongly asserted for a false positive, the level that was missed for a
    /// false negative.
    pub fn pattern_class(&self, kind: AdjustmentKind) -> CrisisLevel {
        match kind {
            AdjustmentKind::FalsePositive => self.detected_level,
            AdjustmentKind::FalseNegative => self.correct_level,
        }
    }
}

/// Audit record of one learning report. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningAdjustment {
    pub id: String,
    pub kind: AdjustmentKind,
    pub detected_level: CrisisLevel,
    pub correct_level: CrisisLevel,
    pub confidence: f64,
    pub reporter_id: String,
    pub reported_at: DateTime<Utc>,
    pub applied: bool,
    pub threshold_overridden: bool,
    /// Sensitivity multiplier of the pattern class after this adjustment.
    pub resulting_multiplier: Option<f64>,
    /// Why the report was not applied.
    pub rejection: Option<String>,
}

impl LearningAdjustment {
    pub fn pattern_class(&self) -> CrisisLevel {
        match self.kind {
            AdjustmentKind::FalsePositive => self.detected_level,
            AdjustmentKind::FalseNegative => self.correct_level,
        }
    }
}
