//! Local keyword matching against the externally owned keyword list.

use std::collections::HashMap;

use ash_core::models::{KeywordEntry, MatchedSpan, Signal};
use ash_core::CrisisLevel;

/// Normalize message text for matching: lower-case, typographic apostrophes
/// folded to ASCII. Match spans index into this string.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Word-boundary substring matcher, O(number of keywords) per message.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatcher {
    entries: Vec<(String, CrisisLevel)>,
}

impl KeywordMatcher {
    pub fn new(entries: &[KeywordEntry]) -> Self {
        let mut normalized: Vec<(String, CrisisLevel)> = Vec::with_capacity(entries.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
        for entry in entries {
            let pattern = normalize_text(entry.pattern.trim());
            if pattern.is_empty() || entry.level == CrisisLevel::None {
                continue;
            }
            // Same pattern listed twice: keep the stronger tier.
            match index.get(&pattern) {
                Some(&slot) => normalized[slot].1 = normalized[slot].1.max(entry.level),
                None => {
                    index.insert(pattern.clone(), normalized.len());
                    normalized.push((pattern, entry.level));
                }
            }
        }
        Self {
            entries: normalized,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One keyword signal per matching entry, at its first whole-word occurrence.
    /// `normalized` must come from [`normalize_text`].
    pub fn match_signals(&self, normalized: &str) -> Vec<Signal> {
        self.entries
            .iter()
            .filter_map(|(pattern, level)| {
                find_whole_word(normalized, pattern).map(|start| {
                    Signal::keyword(
                        *level,
                        MatchedSpan {
                            pattern: pattern.clone(),
                            start,
                            end: start + pattern.len(),
                        },
                    )
                })
            })
            .collect()
    }
}

fn find_whole_word(haystack: &str, needle: &str) -> Option<usize> {
    haystack.match_indices(needle).map(|(i, _)| i).find(|&start| {
        let end = start + needle.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}
