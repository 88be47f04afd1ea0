use std::sync::Arc;
use std::time::Duration;

use ash_core::models::AnalysisResult;
use ash_core::traits::{ICrisisInference, IKeywordSource};
use ash_core::NlpError;
use ash_observability::tracing_setup::events;
use tracing::debug;

use crate::context::ContextFilter;
use crate::ensemble::EnsembleResolver;
use crate::gateway::{ClassificationGateway, NlpOutcome};
use crate::sensitivity::SharedSensitivity;

/// Full classification path for one message.
pub struct Classifier<N, K> {
    gateway: ClassificationGateway<N, K>,
    filter: ContextFilter,
    resolver: EnsembleResolver,
    sensitivity: Arc<SharedSensitivity>,
}

impl<N, K> Classifier<N, K>
where
    N: ICrisisInference,
    K: IKeywordSource,
{
    pub fn new(
        nlp: Arc<N>,
        keywords: Arc<K>,
        timeout: Duration,
        sensitivity: Arc<SharedSensitivity>,
    ) -> Self {
        Self {
            gateway: ClassificationGateway::new(nlp, keywords, timeout),
            filter: ContextFilter::default(),
            resolver: EnsembleResolver::new(),
            sensitivity,
        }
    }

    pub fn with_filter(mut self, filter: ContextFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn sensitivity(&self) -> &Arc<SharedSensitivity> {
        &self.sensitivity
    }

    /// Classify `text`. Always yields a result; NLP failures only degrade it.
    pub async fn classify(&self, text: &str) -> AnalysisResult {
        self.classify_with_outcome(text).await.0
    }

    /// Like [`Classifier::classify`], also returning why the NLP signal was
    /// omitted when the result is degraded.
    pub async fn classify_with_outcome(&self, text: &str) -> (AnalysisResult, Option<NlpError>) {
        let output = self.gateway.classify(text).await;
        let omitted = match &output.nlp {
            NlpOutcome::Omitted(err) => {
                events::classification_degraded(&err.to_string(), err.is_timeout());
                Some(err.clone())
            }
            NlpOutcome::Answered(_) => None,
        };
        let degraded = output.is_degraded();
        let normalized = output.normalized_text.clone();
        let signals = self.filter.filter(&normalized, output.into_signals());

        // Snapshot so a concurrent learning update never tears a resolution.
        let table = self.sensitivity.snapshot();
        let result = self.resolver.resolve(signals, degraded, &table);
        debug!(
            event = "message_classified",
            level = %result.level,
            confidence = result.confidence,
            degraded = result.degraded,
            signals = result.contributing_signals.len(),
        );
        (result, omitted)
    }
}
