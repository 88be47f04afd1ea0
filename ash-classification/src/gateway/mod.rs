//! Classification gateway: local keyword signals plus one bounded NLP call.

mod keyword_matcher;

pub use keyword_matcher::{normalize_text, KeywordMatcher};

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use ash_core::models::{KeywordEntry, NlpVerdict, Signal};
use ash_core::traits::{ICrisisInference, IKeywordSource};
use ash_core::NlpError;

const INFER_OPERATION: &str = "infer_crisis_signal";

/// What the NLP collaborator contributed to one classification.
#[derive(Debug, Clone, PartialEq)]
pub enum NlpOutcome {
    Answered(Signal),
    /// No signal. Distinct from a model answer of `None`.
    Omitted(NlpError),
}

/// Raw votes for one message, before context filtering.
#[derive(Debug, Clone)]
pub struct GatewayOutput {
    /// Lower-cased text that keyword spans index into.
    pub normalized_text: String,
    pub keyword_signals: Vec<Signal>,
    pub nlp: NlpOutcome,
}

impl GatewayOutput {
    pub fn nlp_signal(&self) -> Option<&Signal> {
        match &self.nlp {
            NlpOutcome::Answered(signal) => Some(signal),
            NlpOutcome::Omitted(_) => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.nlp, NlpOutcome::Omitted(_))
    }

    /// Keyword signals followed by the NLP signal, if any.
    pub fn into_signals(self) -> Vec<Signal> {
        let mut signals = self.keyword_signals;
        if let NlpOutcome::Answered(signal) = self.nlp {
            signals.push(signal);
        }
        signals
    }
}

/// Matcher built from the keyword list it was compiled against.
#[derive(Debug, Default)]
struct CachedMatcher {
    source: Vec<KeywordEntry>,
    matcher: Arc<KeywordMatcher>,
}

/// Wraps the NLP collaborator and the active keyword list.
pub struct ClassificationGateway<N, K> {
    nlp: Arc<N>,
    keywords: Arc<K>,
    timeout: Duration,
    matcher: RwLock<CachedMatcher>,
}

impl<N, K> ClassificationGateway<N, K>
where
    N: ICrisisInference,
    K: IKeywordSource,
{
    pub fn new(nlp: Arc<N>, keywords: Arc<K>, timeout: Duration) -> Self {
        Self {
            nlp,
            keywords,
            timeout,
            matcher: RwLock::new(CachedMatcher::default()),
        }
    }

    /// Matcher for the current keyword list. Rebuilt only when the list changes.
    pub fn matcher(&self) -> Arc<KeywordMatcher> {
        let list = self.keywords.keyword_list();
        {
            let cached = self.matcher.read().unwrap_or_else(PoisonError::into_inner);
            if cached.source == list {
                return Arc::clone(&cached.matcher);
            }
        }
        let matcher = Arc::new(KeywordMatcher::new(&list));
        let mut cached = self.matcher.write().unwrap_or_else(PoisonError::into_inner);
        *cached = CachedMatcher {
            source: list,
            matcher: Arc::clone(&matcher),
        };
        matcher
    }

    /// Compute keyword signals and ask the model. Never fails.
    pub async fn classify(&self, text: &str) -> GatewayOutput {
        let normalized_text = normalize_text(text);
        let keyword_signals = self.matcher().match_signals(&normalized_text);

        let nlp = match self.infer(text).await {
            Ok(verdict) => NlpOutcome::Answered(Signal::nlp(verdict.level, verdict.confidence)),
            Err(err) => NlpOutcome::Omitted(err),
        };

        GatewayOutput {
            normalized_text,
            keyword_signals,
            nlp,
        }
    }

    /// One inference call under the timeout ceiling, with the answer validated.
    pub async fn infer(&self, text: &str) -> Result<NlpVerdict, NlpError> {
        match tokio::time::timeout(self.timeout, self.nlp.infer_crisis_signal(text)).await {
            Err(_elapsed) => Err(NlpError::Timeout {
                operation: INFER_OPERATION.to_string(),
                timeout_ms: self.timeout.as_millis() as u64,
            }),
            Ok(Err(err)) => Err(err),
            Ok(Ok(verdict)) => validate_verdict(verdict),
        }
    }
}

fn validate_verdict(verdict: NlpVerdict) -> Result<NlpVerdict, NlpError> {
    if verdict.confidence.is_finite() && (0.0..=1.0).contains(&verdict.confidence) {
        Ok(verdict)
    } else {
        Err(NlpError::Malformed {
            operation: INFER_OPERATION.to_string(),
            reason: format!("confidence {} outside [0, 1]", verdict.confidence),
        })
    }
}
