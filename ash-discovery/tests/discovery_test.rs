//! Integration tests for ash-discovery: admission control, dedup, and the
//! quota under concurrent discovery.

use std::sync::Arc;
use std::time::Duration;

use ash_core::config::EngineConfig;
use ash_core::{AshError, CrisisLevel, NlpError};
use ash_discovery::{DiscoveryPipeline, DiscoveryRequest, SuggestionFilter, SuggestionStore};
use ash_quota::{QuotaCounter, QuotaLimits, QuotaManager};
use test_fixtures::{candidate, ManualClock, ScriptedNlp};

struct Harness {
    nlp: Arc<ScriptedNlp>,
    quota: Arc<QuotaManager>,
    pipeline: DiscoveryPipeline<ScriptedNlp>,
}

fn harness(nlp: ScriptedNlp, max_daily: u32) -> Harness {
    let nlp = Arc::new(nlp);
    let clock = Arc::new(ManualClock::at(2026, 6, 2, 10));
    let quota = Arc::new(QuotaManager::new(
        clock.clone(),
        QuotaLimits {
            max_daily_discoveries: max_daily,
            max_learning_adjustments_per_day: 50,
        },
    ));
    let pipeline = DiscoveryPipeline::new(
        Arc::clone(&nlp),
        Arc::new(SuggestionStore::new()),
        Arc::clone(&quota),
        clock,
        Duration::from_secs(3),
    );
    Harness {
        nlp,
        quota,
        pipeline,
    }
}

fn config(max_daily: u32) -> EngineConfig {
    EngineConfig {
        max_daily_discoveries: max_daily,
        ..EngineConfig::default()
    }
}

fn request(text: &str) -> DiscoveryRequest {
    DiscoveryRequest::new(text, CrisisLevel::High, "mod-7").in_channel("support")
}

#[tokio::test]
async fn admits_confident_candidates() {
    let nlp = ScriptedNlp::new().with_candidates(vec![
        candidate("end it all", 0.92, CrisisLevel::High),
        candidate("whatever", 0.3, CrisisLevel::Low),
    ]);
    let h = harness(nlp, 10);
    let found = h
        .pipeline
        .discover(&request("I just want to end it all"), &config(10))
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    let s = &found[0];
    assert_eq!(s.keyword, "end it all");
    assert!(s.urgent);
    assert!(s.sources.contains("mod-7@support"));
    assert_eq!(
        s.original_message_excerpt.as_deref(),
        Some("I just want to end it all")
    );
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 1);
}

#[tokio::test]
async fn disabled_discovery_never_calls_the_model() {
    let h = harness(ScriptedNlp::new(), 10);
    let cfg = EngineConfig {
        discovery_enabled: false,
        ..EngineConfig::default()
    };
    let err = h.pipeline.discover(&request("anything"), &cfg).await.unwrap_err();
    assert!(matches!(err, AshError::DiscoveryDisabled));
    assert_eq!(h.nlp.extraction_calls(), 0);
}

#[tokio::test]
async fn rediscovery_merges_without_spending_quota() {
    let nlp = ScriptedNlp::new()
        .candidates_for("first", vec![candidate("Give Up", 0.7, CrisisLevel::Medium)])
        .candidates_for("second", vec![candidate("give up", 0.9, CrisisLevel::Medium)]);
    let h = harness(nlp, 10);

    h.pipeline.discover(&request("first"), &config(10)).await.unwrap();
    let second = DiscoveryRequest::new("second", CrisisLevel::Medium, "mod-9");
    let merged = h.pipeline.discover(&second, &config(10)).await.unwrap();

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].confidence, 0.9);
    assert_eq!(merged[0].sources.len(), 2);
    assert_eq!(h.pipeline.store().len(), 1);
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 1);
}

#[tokio::test]
async fn duplicate_candidates_in_one_batch_collapse() {
    let nlp = ScriptedNlp::new().with_candidates(vec![
        candidate("numb", 0.7, CrisisLevel::Medium),
        candidate("NUMB", 0.8, CrisisLevel::Medium),
    ]);
    let h = harness(nlp, 10);
    let found = h.pipeline.discover(&request("so numb"), &config(10)).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].confidence, 0.8);
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 1);
}

#[tokio::test]
async fn malformed_candidates_are_dropped() {
    let nlp = ScriptedNlp::new().with_candidates(vec![
        candidate("   ", 0.9, CrisisLevel::High),
        candidate("spiral", 1.4, CrisisLevel::High),
        candidate("spiral", f64::NAN, CrisisLevel::High),
        candidate("ok", 0.9, CrisisLevel::None),
    ]);
    let h = harness(nlp, 10);
    let found = h.pipeline.discover(&request("text"), &config(10)).await.unwrap();
    assert!(found.is_empty());
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 0);
}

#[tokio::test]
async fn min_confidence_comes_from_the_supplied_config() {
    let nlp =
        ScriptedNlp::new().with_candidates(vec![candidate("drained", 0.65, CrisisLevel::Low)]);
    let h = harness(nlp, 10);
    let strict = EngineConfig {
        min_confidence: 0.7,
        ..EngineConfig::default()
    };
    assert!(h.pipeline.discover(&request("a"), &strict).await.unwrap().is_empty());
    assert_eq!(h.pipeline.discover(&request("b"), &config(10)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn rejects_invalid_requests() {
    let h = harness(ScriptedNlp::new(), 10);
    let empty = h.pipeline.discover(&request("   "), &config(10)).await;
    assert!(matches!(empty, Err(AshError::ValidationError { .. })));

    let none = DiscoveryRequest::new("hello", CrisisLevel::None, "mod");
    let none = h.pipeline.discover(&none, &config(10)).await;
    assert!(matches!(none, Err(AshError::ValidationError { .. })));
    assert_eq!(h.nlp.extraction_calls(), 0);
}

#[tokio::test]
async fn quota_runs_out_mid_batch() {
    let nlp = ScriptedNlp::new()
        .candidates_for(
            "batch",
            vec![
                candidate("alpha", 0.9, CrisisLevel::High),
                candidate("bravo", 0.8, CrisisLevel::High),
                candidate("charlie", 0.7, CrisisLevel::High),
            ],
        )
        .candidates_for("later", vec![candidate("delta", 0.9, CrisisLevel::High)]);
    let h = harness(nlp, 2);

    let found = h.pipeline.discover(&request("batch"), &config(2)).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(h.pipeline.store().len(), 2);
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 2);

    let extraction_calls = h.nlp.extraction_calls();
    let err = h.pipeline.discover(&request("later"), &config(2)).await.unwrap_err();
    assert!(matches!(err, AshError::QuotaExceeded { used: 2, limit: 2, .. }));
    assert_eq!(h.nlp.extraction_calls(), extraction_calls);
}

#[tokio::test(start_paused = true)]
async fn nothing_admitted_is_quota_exceeded() {
    let nlp = ScriptedNlp::new().with_candidates(vec![candidate("alpha", 0.9, CrisisLevel::High)]);
    let h = harness(nlp, 1);
    // Another caller takes the last unit between the pre-check and admission.
    let pipeline = &h.pipeline;
    let quota = Arc::clone(&h.quota);
    h.nlp.set_delay(Some(Duration::from_millis(20)));
    let racer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        quota.try_reserve(QuotaCounter::Discoveries)
    });
    let result = pipeline.discover(&request("x"), &config(1)).await;
    assert!(racer.await.unwrap());
    assert!(matches!(result, Err(AshError::QuotaExceeded { .. })));
    assert!(pipeline.store().is_empty());
}

#[tokio::test(start_paused = true)]
async fn extraction_timeout_is_upstream_timeout() {
    let h = harness(ScriptedNlp::new().with_delay(Duration::from_secs(10)), 10);
    let err = h.pipeline.discover(&request("x"), &config(10)).await.unwrap_err();
    assert!(matches!(err, AshError::UpstreamTimeout { timeout_ms: 3000, .. }));
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), 0);
}

#[tokio::test]
async fn extraction_failure_is_upstream_error() {
    let nlp = ScriptedNlp::new().failing(NlpError::Malformed {
        operation: "extract_keyword_candidates".into(),
        reason: "not json".into(),
    });
    let h = harness(nlp, 10);
    let err = h.pipeline.discover(&request("x"), &config(10)).await.unwrap_err();
    assert!(matches!(err, AshError::UpstreamError { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_discoveries_never_exceed_quota() {
    const CALLERS: usize = 24;
    const LIMIT: u32 = 5;

    let mut nlp = ScriptedNlp::new();
    for i in 0..CALLERS {
        nlp = nlp.candidates_for(
            &format!("message {i}"),
            vec![candidate(&format!("phrase {i}"), 0.9, CrisisLevel::High)],
        );
    }
    let h = Arc::new(harness(nlp, LIMIT));

    let tasks: Vec<_> = (0..CALLERS)
        .map(|i| {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.pipeline
                    .discover(&request(&format!("message {i}")), &config(LIMIT))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(found) => created += found.len(),
            Err(AshError::QuotaExceeded { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created, LIMIT as usize);
    assert_eq!(h.pipeline.store().len(), LIMIT as usize);
    assert_eq!(h.quota.current_count(QuotaCounter::Discoveries), LIMIT);
    assert_eq!(
        h.pipeline.store().list(&SuggestionFilter::default()).len(),
        LIMIT as usize
    );
}
