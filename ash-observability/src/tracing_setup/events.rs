//! Structured log events for key engine operations.
//!
//! Each function emits a `tracing` event with structured fields. No event
//! carries message text beyond the stored 100-character excerpt.

/// Classification fell back to keyword-only mode.
pub fn classification_degraded(failure: &str, timed_out: bool) {
    tracing::warn!(
        event = "classification_degraded",
        failure = %failure,
        timed_out = timed_out,
        "NLP signal omitted, keyword-only classification"
    );
}

/// A new pending suggestion was admitted.
pub fn suggestion_discovered(keyword: &str, level: &str, confidence: f64, source: &str) {
    tracing::info!(
        event = "suggestion_discovered",
        keyword = %keyword,
        level = %level,
        confidence = confidence,
        source = %source,
        "keyword suggestion discovered"
    );
}

/// A re-discovery merged into an existing pending suggestion.
pub fn suggestion_merged(keyword: &str, confidence: f64, sources: usize) {
    tracing::info!(
        event = "suggestion_merged",
        keyword = %keyword,
        confidence = confidence,
        sources = sources,
        "keyword suggestion merged"
    );
}

pub fn suggestion_promoted(keyword: &str, level: &str) {
    tracing::info!(
        event = "suggestion_promoted",
        keyword = %keyword,
        level = %level,
        "keyword suggestion promoted"
    );
}

pub fn suggestions_cleared(scope: &str, removed: usize) {
    tracing::info!(
        event = "suggestions_cleared",
        scope = %scope,
        removed = removed,
        "keyword suggestions cleared"
    );
}

pub fn quota_exhausted(counter: &str, used: u32, limit: u32) {
    tracing::warn!(
        event = "quota_exhausted",
        counter = %counter,
        used = used,
        limit = limit,
        "daily quota exhausted"
    );
}

pub fn quota_window_rolled_over(
    previous_window: &str,
    discoveries: u32,
    learning_adjustments: u32,
) {
    tracing::info!(
        event = "quota_window_rolled_over",
        previous_window = %previous_window,
        discoveries = discoveries,
        learning_adjustments = learning_adjustments,
        "daily quota window rolled over"
    );
}

pub fn learning_applied(kind: &str, class: &str, confidence: f64, multiplier: f64) {
    tracing::info!(
        event = "learning_applied",
        kind = %kind,
        class = %class,
        confidence = confidence,
        multiplier = multiplier,
        "sensitivity adjustment applied"
    );
}

pub fn learning_rejected(kind: &str, reason: &str) {
    tracing::info!(
        event = "learning_rejected",
        kind = %kind,
        reason = %reason,
        "learning report rejected"
    );
}

/// Team override bypassed the confidence threshold. Audited separately.
pub fn threshold_override_used(kind: &str, reporter_id: &str, confidence: f64, threshold: f64) {
    tracing::warn!(
        event = "threshold_override_used",
        kind = %kind,
        reporter_id = %reporter_id,
        confidence = confidence,
        threshold = threshold,
        "confidence threshold bypassed by team override"
    );
}

pub fn config_updated(field: &str, value: &str) {
    tracing::info!(
        event = "config_updated",
        field = %field,
        value = %value,
        "engine config updated"
    );
}

pub fn config_rejected(field: &str, reason: &str) {
    tracing::warn!(
        event = "config_rejected",
        field = %field,
        reason = %reason,
        "engine config update rejected"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "component recovered"
    );
}
