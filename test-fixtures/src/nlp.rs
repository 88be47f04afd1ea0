//! ScriptedNlp: a programmable stand-in for the NLP inference service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use ash_core::models::{KeywordCandidate, NlpVerdict};
use ash_core::traits::{ICrisisInference, IKeywordExtractor};
use ash_core::{CrisisLevel, NlpError};

/// Build an extraction candidate.
pub fn candidate(keyword: &str, confidence: f64, level: CrisisLevel) -> KeywordCandidate {
    KeywordCandidate {
        keyword: keyword.to_string(),
        confidence,
        crisis_level: level,
        reasoning: format!("'{keyword}' co-occurs with {level} crisis language"),
    }
}

#[derive(Debug, Default)]
struct Script {
    default_verdict: Option<NlpVerdict>,
    /// First rule whose needle appears in the lower-cased text wins.
    verdict_rules: Vec<(String, NlpVerdict)>,
    default_candidates: Vec<KeywordCandidate>,
    candidates_by_text: HashMap<String, Vec<KeywordCandidate>>,
    delay: Option<Duration>,
    failure: Option<NlpError>,
}

/// Scripted NLP collaborator. Every knob can be changed through `&self`.
#[derive(Debug)]
pub struct ScriptedNlp {
    script: Mutex<Script>,
    inference_calls: AtomicUsize,
    extraction_calls: AtomicUsize,
}

impl Default for ScriptedNlp {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedNlp {
    /// Answers `None` with 0.9 confidence and extracts nothing.
    pub fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                default_verdict: Some(NlpVerdict {
                    level: CrisisLevel::None,
                    confidence: 0.9,
                }),
                ..Script::default()
            }),
            inference_calls: AtomicUsize::new(0),
            extraction_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_verdict(self, level: CrisisLevel, confidence: f64) -> Self {
        self.set_verdict(level, confidence);
        self
    }

    pub fn set_verdict(&self, level: CrisisLevel, confidence: f64) {
        self.script.lock().unwrap().default_verdict = Some(NlpVerdict { level, confidence });
    }

    pub fn verdict_for(self, needle: &str, level: CrisisLevel, confidence: f64) -> Self {
        self.script
            .lock()
            .unwrap()
            .verdict_rules
            .push((needle.to_lowercase(), NlpVerdict { level, confidence }));
        self
    }

    pub fn with_candidates(self, candidates: Vec<KeywordCandidate>) -> Self {
        self.set_candidates(candidates);
        self
    }

    pub fn set_candidates(&self, candidates: Vec<KeywordCandidate>) {
        self.script.lock().unwrap().default_candidates = candidates;
    }

    pub fn candidates_for(self, text: &str, candidates: Vec<KeywordCandidate>) -> Self {
        self.script
            .lock()
            .unwrap()
            .candidates_by_text
            .insert(text.to_string(), candidates);
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.script.lock().unwrap().delay = delay;
    }

    /// Every call fails with this error.
    pub fn failing(self, error: NlpError) -> Self {
        self.set_failure(Some(error));
        self
    }

    pub fn set_failure(&self, error: Option<NlpError>) {
        self.script.lock().unwrap().failure = error;
    }

    pub fn inference_calls(&self) -> usize {
        self.inference_calls.load(Ordering::SeqCst)
    }

    pub fn extraction_calls(&self) -> usize {
        self.extraction_calls.load(Ordering::SeqCst)
    }

    fn delay(&self) -> Option<Duration> {
        self.script.lock().unwrap().delay
    }
}

impl ICrisisInference for ScriptedNlp {
    async fn infer_crisis_signal(&self, text: &str) -> Result<NlpVerdict, NlpError> {
        self.inference_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay() {
            tokio::time::sleep(delay).await;
        }
        let script = self.script.lock().unwrap();
        if let Some(err) = &script.failure {
            return Err(err.clone());
        }
        let lowered = text.to_lowercase();
        let verdict = script
            .verdict_rules
            .iter()
            .find(|(needle, _)| lowered.contains(needle.as_str()))
            .map(|(_, verdict)| *verdict)
            .or(script.default_verdict);
        verdict.ok_or_else(|| NlpError::Unavailable {
            operation: "infer_crisis_signal".to_string(),
            reason: "no scripted verdict".to_string(),
        })
    }
}

impl IKeywordExtractor for ScriptedNlp {
    async fn extract_keyword_candidates(
        &self,
        text: &str,
        _asserted_level: CrisisLevel,
    ) -> Result<Vec<KeywordCandidate>, NlpError> {
        self.extraction_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay() {
            tokio::time::sleep(delay).await;
        }
        let script = self.script.lock().unwrap();
        if let Some(err) = &script.failure {
            return Err(err.clone());
        }
        Ok(script
            .candidates_by_text
            .get(text)
            .cloned()
            .unwrap_or_else(|| script.default_candidates.clone()))
    }
}
