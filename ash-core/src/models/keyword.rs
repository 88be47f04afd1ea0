//! Collaborator-facing keyword and inference payloads.

use serde::{Deserialize, Serialize};

use super::CrisisLevel;

/// One active keyword owned by the external keyword store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub pattern: String,
    pub level: CrisisLevel,
}

impl KeywordEntry {
    pub fn new(pattern: impl Into<String>, level: CrisisLevel) -> Self {
        Self {
            pattern: pattern.into(),
            level,
        }
    }
}

/// Answer of the NLP crisis-inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NlpVerdict {
    pub level: CrisisLevel,
    pub confidence: f64,
}

/// A keyword proposed by the NLP extraction call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordCandidate {
    pub keyword: String,
    pub confidence: f64,
    pub crisis_level: CrisisLevel,
    pub reasoning: String,
}
