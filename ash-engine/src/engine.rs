//! CrisisEngine: wires the subsystems together and owns their shared state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use ash_classification::{Classifier, SensitivityTable, SharedSensitivity};
use ash_core::constants::NLP_COMPONENT;
use ash_core::models::{EngineStats, FeedbackReport, KeywordSuggestion, LearningAdjustment};
use ash_core::traits::{ICrisisInference, IKeywordExtractor, IKeywordSource};
use ash_core::{
    AnalysisResult, AshConfig, AshError, AshResult, Clock, ConfigField, ConfigValue, EngineConfig,
    SystemClock,
};
use ash_discovery::{
    ClearScope, DiscoveryPipeline, DiscoveryRequest, SuggestionFilter, SuggestionStore,
};
use ash_learning::FeedbackProcessor;
use ash_observability::tracing_setup::events;
use ash_observability::{DegradationEvent, DegradationTracker, TrackedDegradation};
use ash_quota::{QuotaCounter, QuotaLimits, QuotaManager};
use tracing::info;

const KEYWORD_ONLY_FALLBACK: &str = "keyword_only_classification";
const NO_FALLBACK: &str = "none";

/// The single owned engine instance.
///
/// `N` is the NLP collaborator (inference and extraction), `K` the external
/// keyword store.
pub struct CrisisEngine<N, K> {
    config: RwLock<Arc<EngineConfig>>,
    clock: Arc<dyn Clock>,
    quota: Arc<QuotaManager>,
    sensitivity: Arc<SharedSensitivity>,
    store: Arc<SuggestionStore>,
    classifier: Classifier<N, K>,
    discovery: DiscoveryPipeline<N>,
    learning: FeedbackProcessor,
    degradation: Mutex<DegradationTracker>,
}

impl<N, K> CrisisEngine<N, K>
where
    N: ICrisisInference + IKeywordExtractor,
    K: IKeywordSource,
{
    pub fn new(config: AshConfig, nlp: Arc<N>, keywords: Arc<K>) -> AshResult<Self> {
        Self::with_clock(config, nlp, keywords, Arc::new(SystemClock))
    }

    /// Build with an explicit time source. Fails if `config` is invalid.
    pub fn with_clock(
        config: AshConfig,
        nlp: Arc<N>,
        keywords: Arc<K>,
        clock: Arc<dyn Clock>,
    ) -> AshResult<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.nlp.timeout_ms);
        let quota = Arc::new(QuotaManager::new(
            Arc::clone(&clock),
            QuotaLimits::from(&config.engine),
        ));
        let sensitivity = Arc::new(SharedSensitivity::new(SensitivityTable::new(
            config.sensitivity.clone(),
        )));
        let store = Arc::new(SuggestionStore::new());

        let classifier = Classifier::new(
            Arc::clone(&nlp),
            keywords,
            timeout,
            Arc::clone(&sensitivity),
        );
        let discovery = DiscoveryPipeline::new(
            nlp,
            Arc::clone(&store),
            Arc::clone(&quota),
            Arc::clone(&clock),
            timeout,
        );
        let learning = FeedbackProcessor::new(
            Arc::clone(&sensitivity),
            Arc::clone(&quota),
            Arc::clone(&clock),
        );

        info!(
            event = "engine_started",
            version = ash_core::constants::VERSION,
            nlp_timeout_ms = config.nlp.timeout_ms,
            discovery_enabled = config.engine.discovery_enabled,
        );

        Ok(Self {
            config: RwLock::new(Arc::new(config.engine)),
            clock,
            quota,
            sensitivity,
            store,
            classifier,
            discovery,
            learning,
            degradation: Mutex::new(DegradationTracker::new()),
        })
    }

    // ── Classification ────────────────────────────────────────────────────

    /// Classify one message. Never fails; NLP trouble yields a degraded,
    /// keyword-only result.
    pub async fn classify(&self, text: &str) -> AnalysisResult {
        let (result, omitted) = self.classifier.classify_with_outcome(text).await;
        match omitted {
            Some(err) => self.record_nlp_failure(&err.to_string(), KEYWORD_ONLY_FALLBACK),
            None => self.record_nlp_success(),
        }
        result
    }

    // ── Discovery and review ──────────────────────────────────────────────

    /// Extract and admit keyword suggestions for a human-asserted miss.
    pub async fn discover(&self, request: &DiscoveryRequest) -> AshResult<Vec<KeywordSuggestion>> {
        let config = self.config();
        let outcome = self.discovery.discover(request, &config).await;
        match &outcome {
            Err(err @ (AshError::UpstreamTimeout { .. } | AshError::UpstreamError { .. })) => {
                self.record_nlp_failure(&err.to_string(), NO_FALLBACK)
            }
            Ok(_) => self.record_nlp_success(),
            Err(_) => {}
        }
        outcome
    }

    pub fn list_pending(&self, filter: &SuggestionFilter) -> Vec<KeywordSuggestion> {
        self.store.list(filter)
    }

    /// Remove a pending suggestion so the caller can add it to the keyword store.
    pub fn promote(&self, keyword: &str) -> AshResult<KeywordSuggestion> {
        self.store.promote(keyword)
    }

    /// Discard pending suggestions; returns the exact number removed.
    pub fn clear(&self, scope: &ClearScope) -> AshResult<usize> {
        self.store.clear(scope)
    }

    // ── Learning ──────────────────────────────────────────────────────────

    pub fn report_false_positive(&self, report: &FeedbackReport) -> AshResult<LearningAdjustment> {
        let config = self.config();
        self.learning.report_false_positive(report, &config)
    }

    pub fn report_false_negative(&self, report: &FeedbackReport) -> AshResult<LearningAdjustment> {
        let config = self.config();
        self.learning.report_false_negative(report, &config)
    }

    /// Audit log of every admitted or rejected learning report.
    pub fn learning_history(&self) -> Vec<LearningAdjustment> {
        self.learning.history()
    }

    pub fn sensitivity(&self) -> SensitivityTable {
        self.sensitivity.snapshot()
    }

    // ── Stats and configuration ───────────────────────────────────────────

    pub fn stats(&self) -> EngineStats {
        let config = self.config();
        let counters = self.quota.snapshot();
        let degradation = self.degradation();
        EngineStats {
            discovery_enabled: config.discovery_enabled,
            discoveries_today: counters.discoveries_today,
            max_daily_discoveries: config.max_daily_discoveries,
            min_confidence: config.min_confidence,
            last_discovery_date: counters.last_discovery_at,
            learning_adjustments_today: counters.learning_adjustments_today,
            max_learning_adjustments_per_day: config.max_learning_adjustments_per_day,
            learning_confidence_threshold: config.learning_confidence_threshold,
            pending_suggestions: self.store.len(),
            nlp_degraded: degradation.is_degraded(NLP_COMPONENT),
            degradation_events: degradation.events().len(),
        }
    }

    /// The live configuration. Operations started after an update see it.
    pub fn config(&self) -> Arc<EngineConfig> {
        Arc::clone(&self.config.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Change one field. An invalid value fails with `ValidationError` and
    /// leaves every field as it was.
    pub fn update_config(&self, field: ConfigField, value: ConfigValue) -> AshResult<()> {
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let next = match current.with_update(field, value) {
            Ok(next) => next,
            Err(err) => {
                events::config_rejected(field.as_str(), &err.to_string());
                return Err(err);
            }
        };
        self.quota.set_limits(QuotaLimits::from(&next));
        *current = Arc::new(next);
        events::config_updated(field.as_str(), &value.to_string());
        Ok(())
    }

    /// [`update_config`](Self::update_config) from the chat-surface spelling,
    /// e.g. `("minConfidence", "0.75")`.
    pub fn update_config_str(&self, field: &str, raw: &str) -> AshResult<()> {
        let field: ConfigField = field.parse()?;
        let value = ConfigValue::parse_for(field, raw)?;
        self.update_config(field, value)
    }

    pub fn quota_count(&self, counter: QuotaCounter) -> u32 {
        self.quota.current_count(counter)
    }

    pub fn degradation_history(&self) -> Vec<TrackedDegradation> {
        self.degradation().events().to_vec()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn degradation(&self) -> MutexGuard<'_, DegradationTracker> {
        self.degradation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_nlp_failure(&self, failure: &str, fallback: &str) {
        self.degradation().record(DegradationEvent {
            component: NLP_COMPONENT.to_string(),
            failure: failure.to_string(),
            fallback_used: fallback.to_string(),
            timestamp: self.clock.now(),
        });
    }

    fn record_nlp_success(&self) {
        let now = self.clock.now();
        let mut tracker = self.degradation();
        if tracker.is_degraded(NLP_COMPONENT) {
            tracker.mark_recovered(NLP_COMPONENT, now);
        }
    }
}
