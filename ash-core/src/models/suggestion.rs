use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CrisisLevel;
use crate::constants::MESSAGE_EXCERPT_CHARS;

/// A candidate crisis keyword awaiting human review.
///
/// Identity is the normalized keyword text; see [`normalize_keyword`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
    pub crisis_level: CrisisLevel,
    pub confidence: f64,
    /// Provenance of every discovery that produced or merged into this row.
    pub sources: BTreeSet<String>,
    pub reasoning: String,
    pub original_message_excerpt: Option<String>,
    pub discovered_at: DateTime<Utc>,
    pub urgent: bool,
}

impl KeywordSuggestion {
    pub fn new(
        keyword: &str,
        crisis_level: CrisisLevel,
        confidence: f64,
        source: impl Into<String>,
        reasoning: impl Into<String>,
        message: Option<&str>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            keyword: normalize_keyword(keyword),
            crisis_level,
            confidence: confidence.clamp(0.0, 1.0),
            sources: BTreeSet::from([source.into()]),
            reasoning: reasoning.into(),
            original_message_excerpt: message.map(excerpt),
            discovered_at,
            urgent: crisis_level == CrisisLevel::High,
        }
    }

    /// Fold a re-discovery of the same keyword into this row: max confidence,
    /// union of sources, earliest discovery time. The higher-confidence
    /// discovery supplies the reasoning; the level never drops.
    pub fn merge(&mut self, other: KeywordSuggestion) {
        if other.confidence > self.confidence {
            self.confidence = other.confidence;
            self.reasoning = other.reasoning;
            if other.original_message_excerpt.is_some() {
                self.original_message_excerpt = other.original_message_excerpt;
            }
        }
        self.crisis_level = self.crisis_level.max(other.crisis_level);
        self.urgent = self.crisis_level == CrisisLevel::High;
        self.sources.extend(other.sources);
        self.discovered_at = self.discovered_at.min(other.discovered_at);
    }
}

/// Case-insensitive identity key: trimmed, lower-cased, inner whitespace collapsed.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn excerpt(message: &str) -> String {
    match message.char_indices().nth(MESSAGE_EXCERPT_CHARS) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}
