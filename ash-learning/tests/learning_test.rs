//! Integration tests for ash-learning: threshold gate, daily cap, override
//! audit, and the effect on sensitivity.

use std::sync::Arc;

use ash_classification::SharedSensitivity;
use ash_core::config::EngineConfig;
use ash_core::models::FeedbackReport;
use ash_core::{AshError, CrisisLevel};
use ash_learning::FeedbackProcessor;
use ash_quota::{QuotaCounter, QuotaLimits, QuotaManager};
use chrono::Duration;
use proptest::prelude::*;
use test_fixtures::ManualClock;

struct Harness {
    clock: Arc<ManualClock>,
    quota: Arc<QuotaManager>,
    sensitivity: Arc<SharedSensitivity>,
    processor: FeedbackProcessor,
}

fn harness(max_learning: u32) -> Harness {
    let clock = Arc::new(ManualClock::at(2026, 7, 9, 8));
    let quota = Arc::new(QuotaManager::new(
        clock.clone(),
        QuotaLimits {
            max_daily_discoveries: 10,
            max_learning_adjustments_per_day: max_learning,
        },
    ));
    let sensitivity = Arc::new(SharedSensitivity::default());
    let processor =
        FeedbackProcessor::new(Arc::clone(&sensitivity), Arc::clone(&quota), clock.clone());
    Harness {
        clock,
        quota,
        sensitivity,
        processor,
    }
}

fn false_positive(confidence: f64) -> FeedbackReport {
    FeedbackReport::new(CrisisLevel::Medium, CrisisLevel::None, confidence, "mod-3")
}

#[test]
fn low_confidence_report_is_rejected_without_effect() {
    let h = harness(50);
    let err = h
        .processor
        .report_false_positive(&false_positive(0.3), &EngineConfig::default())
        .unwrap_err();
    assert!(matches!(err, AshError::BelowThreshold { .. }));
    assert_eq!(h.sensitivity.snapshot().multiplier(CrisisLevel::Medium), 1.0);
    assert_eq!(h.quota.current_count(QuotaCounter::LearningAdjustments), 0);

    let history = h.processor.history();
    assert_eq!(history.len(), 1);
    assert!(!history[0].applied);
    assert!(history[0].rejection.is_some());
}

#[test]
fn confident_false_positive_lowers_the_class() {
    let h = harness(50);
    let adjustment = h
        .processor
        .report_false_positive(&false_positive(0.9), &EngineConfig::default())
        .unwrap();
    assert!(adjustment.applied);
    assert!(!adjustment.threshold_overridden);
    let multiplier = h.sensitivity.snapshot().multiplier(CrisisLevel::Medium);
    assert!(multiplier < 1.0);
    assert_eq!(adjustment.resulting_multiplier, Some(multiplier));
    assert_eq!(h.quota.current_count(QuotaCounter::LearningAdjustments), 1);
}

#[test]
fn false_negative_raises_the_missed_class() {
    let h = harness(50);
    let report = FeedbackReport::new(CrisisLevel::Low, CrisisLevel::High, 0.8, "mod-3");
    h.processor
        .report_false_negative(&report, &EngineConfig::default())
        .unwrap();
    let table = h.sensitivity.snapshot();
    assert!(table.multiplier(CrisisLevel::High) > 1.0);
    assert_eq!(table.multiplier(CrisisLevel::Low), 1.0);
}

#[test]
fn override_bypasses_threshold_and_is_audited() {
    let h = harness(50);
    let report = false_positive(0.2).with_threshold_override();
    let adjustment = h
        .processor
        .report_false_positive(&report, &EngineConfig::default())
        .unwrap();
    assert!(adjustment.applied);
    assert!(adjustment.threshold_overridden);
    assert_eq!(h.processor.audit().overridden().len(), 1);
}

#[test]
fn override_never_bypasses_the_daily_cap() {
    let h = harness(1);
    let cfg = EngineConfig::default();
    h.processor.report_false_positive(&false_positive(0.9), &cfg).unwrap();
    let err = h
        .processor
        .report_false_positive(&false_positive(0.9).with_threshold_override(), &cfg)
        .unwrap_err();
    assert!(matches!(err, AshError::QuotaExceeded { used: 1, limit: 1, .. }));
    assert_eq!(h.processor.audit().applied_count(), 1);
    assert_eq!(h.processor.audit().len(), 2);
}

#[test]
fn cap_reopens_after_rollover() {
    let h = harness(1);
    let cfg = EngineConfig::default();
    h.processor.report_false_positive(&false_positive(0.9), &cfg).unwrap();
    assert!(h.processor.report_false_positive(&false_positive(0.9), &cfg).is_err());
    h.clock.advance(Duration::days(1));
    assert!(h.processor.report_false_positive(&false_positive(0.9), &cfg).is_ok());
}

#[test]
fn inconsistent_report_is_a_validation_error_and_not_logged() {
    let h = harness(50);
    let wrong_way = FeedbackReport::new(CrisisLevel::None, CrisisLevel::High, 0.9, "mod-3");
    let err = h
        .processor
        .report_false_positive(&wrong_way, &EngineConfig::default())
        .unwrap_err();
    assert!(matches!(err, AshError::ValidationError { .. }));
    assert!(h.processor.audit().is_empty());
}

proptest! {
    #[test]
    fn multipliers_stay_within_bounds(
        reports in prop::collection::vec((any::<bool>(), 0.6f64..=1.0), 0..60),
    ) {
        let h = harness(1000);
        let cfg = EngineConfig::default();
        for (positive, confidence) in reports {
            if positive {
                h.processor.report_false_positive(&false_positive(confidence), &cfg).unwrap();
            } else {
                let fn_report =
                    FeedbackReport::new(CrisisLevel::Low, CrisisLevel::Medium, confidence, "m");
                h.processor.report_false_negative(&fn_report, &cfg).unwrap();
            }
        }
        let m = h.sensitivity.snapshot().multiplier(CrisisLevel::Medium);
        prop_assert!((0.5..=1.5).contains(&m));
    }
}
