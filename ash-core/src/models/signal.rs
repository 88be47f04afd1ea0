use serde::{Deserialize, Serialize};

use super::CrisisLevel;

/// Origin of an ensemble vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Keyword,
    NlpModel,
    ContextFilter,
}

/// Byte span of a keyword match inside the normalized (lower-cased) message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedSpan {
    pub pattern: String,
    pub start: usize,
    pub end: usize,
}

/// An intermediate vote consumed by the ensemble resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub source: SignalSource,
    pub level: CrisisLevel,
    /// Vote strength in [0, 1].
    pub weight: f64,
    /// Present for keyword signals.
    pub matched: Option<MatchedSpan>,
}

impl Signal {
    pub fn keyword(level: CrisisLevel, span: MatchedSpan) -> Self {
        Self {
            source: SignalSource::Keyword,
            level,
            weight: level.keyword_weight(),
            matched: Some(span),
        }
    }

    pub fn nlp(level: CrisisLevel, confidence: f64) -> Self {
        Self {
            source: SignalSource::NlpModel,
            level,
            weight: confidence.clamp(0.0, 1.0),
            matched: None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        self.source == SignalSource::Keyword
    }

    pub fn is_nlp(&self) -> bool {
        self.source == SignalSource::NlpModel
    }
}
