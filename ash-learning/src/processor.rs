//! FeedbackProcessor: validate → threshold gate → quota → adjust → audit.

use std::sync::Arc;

use ash_classification::SharedSensitivity;
use ash_core::config::EngineConfig;
use ash_core::models::{AdjustmentKind, FeedbackReport, LearningAdjustment};
use ash_core::{AshError, AshResult, Clock};
use ash_observability::tracing_setup::events;
use ash_quota::{QuotaCounter, QuotaManager};
use uuid::Uuid;

use crate::audit::AuditLog;

pub struct FeedbackProcessor {
    sensitivity: Arc<SharedSensitivity>,
    quota: Arc<QuotaManager>,
    clock: Arc<dyn Clock>,
    audit: AuditLog,
}

impl FeedbackProcessor {
    pub fn new(
        sensitivity: Arc<SharedSensitivity>,
        quota: Arc<QuotaManager>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sensitivity,
            quota,
            clock,
            audit: AuditLog::new(),
        }
    }

    pub fn report_false_positive(
        &self,
        report: &FeedbackReport,
        config: &EngineConfig,
    ) -> AshResult<LearningAdjustment> {
        self.process(AdjustmentKind::FalsePositive, report, config)
    }

    pub fn report_false_negative(
        &self,
        report: &FeedbackReport,
        config: &EngineConfig,
    ) -> AshResult<LearningAdjustment> {
        self.process(AdjustmentKind::FalseNegative, report, config)
    }

    /// Apply one report. Malformed reports fail with `ValidationError` and are
    /// not logged; threshold and quota rejections are logged with
    /// `applied = false`.
    pub fn process(
        &self,
        kind: AdjustmentKind,
        report: &FeedbackReport,
        config: &EngineConfig,
    ) -> AshResult<LearningAdjustment> {
        validate(kind, report)?;

        let threshold = config.learning_confidence_threshold;
        let below = report.confidence < threshold;
        if below && !report.threshold_override {
            let err = AshError::BelowThreshold {
                confidence: report.confidence,
                threshold,
            };
            self.reject(kind, report, &err);
            return Err(err);
        }

        if !self.quota.try_reserve(QuotaCounter::LearningAdjustments) {
            let err = self.quota.exceeded(QuotaCounter::LearningAdjustments);
            self.reject(kind, report, &err);
            return Err(err);
        }

        let class = report.pattern_class(kind);
        let multiplier = self
            .sensitivity
            .update(|table| table.adjust(kind, class, report.confidence));

        let overridden = below && report.threshold_override;
        if overridden {
            events::threshold_override_used(
                kind.as_str(),
                &report.reporter_id,
                report.confidence,
                threshold,
            );
        }
        events::learning_applied(kind.as_str(), class.as_str(), report.confidence, multiplier);

        let mut adjustment = self.record(kind, report);
        adjustment.applied = true;
        adjustment.threshold_overridden = overridden;
        adjustment.resulting_multiplier = Some(multiplier);
        self.audit.append(adjustment.clone());
        Ok(adjustment)
    }

    pub fn history(&self) -> Vec<LearningAdjustment> {
        self.audit.history()
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    fn reject(&self, kind: AdjustmentKind, report: &FeedbackReport, err: &AshError) {
        let reason = err.to_string();
        events::learning_rejected(kind.as_str(), &reason);
        let mut adjustment = self.record(kind, report);
        adjustment.rejection = Some(reason);
        self.audit.append(adjustment);
    }

    fn record(&self, kind: AdjustmentKind, report: &FeedbackReport) -> LearningAdjustment {
        LearningAdjustment {
            id: Uuid::new_v4().to_string(),
            kind,
            detected_level: report.detected_level,
            correct_level: report.correct_level,
            confidence: report.confidence,
            reporter_id: report.reporter_id.clone(),
            reported_at: self.clock.now(),
            applied: false,
            threshold_overridden: false,
            resulting_multiplier: None,
            rejection: None,
        }
    }
}

/// A false positive must name a lower correct level, a false negative a higher one.
fn validate(kind: AdjustmentKind, report: &FeedbackReport) -> AshResult<()> {
    if !report.confidence.is_finite() || !(0.0..=1.0).contains(&report.confidence) {
        return Err(AshError::validation(
            "confidence",
            format!("{} is outside [0, 1]", report.confidence),
        ));
    }
    if report.reporter_id.trim().is_empty() {
        return Err(AshError::validation("reporter_id", "reporter id is empty"));
    }
    let consistent = match kind {
        AdjustmentKind::FalsePositive => report.correct_level < report.detected_level,
        AdjustmentKind::FalseNegative => report.correct_level > report.detected_level,
    };
    if !consistent {
        return Err(AshError::validation(
            "correct_level",
            format!(
                "{} report with detected {} and correct {}",
                kind.as_str(),
                report.detected_level,
                report.correct_level
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash_core::CrisisLevel;

    #[test]
    fn direction_is_validated() {
        let fp = FeedbackReport::new(CrisisLevel::Low, CrisisLevel::High, 0.9, "m");
        assert!(validate(AdjustmentKind::FalsePositive, &fp).is_err());
        assert!(validate(AdjustmentKind::FalseNegative, &fp).is_ok());

        let same = FeedbackReport::new(CrisisLevel::Low, CrisisLevel::Low, 0.9, "m");
        assert!(validate(AdjustmentKind::FalsePositive, &same).is_err());
        assert!(validate(AdjustmentKind::FalseNegative, &same).is_err());
    }

    #[test]
    fn confidence_must_be_a_probability() {
        let bad = FeedbackReport::new(CrisisLevel::High, CrisisLevel::None, 1.2, "m");
        assert!(matches!(
            validate(AdjustmentKind::FalsePositive, &bad),
            Err(AshError::ValidationError { .. })
        ));
    }
}
