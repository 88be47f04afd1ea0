//! SuggestionStore: pending suggestions keyed by normalized keyword.

use std::cmp::Ordering;
use std::fmt;

use ash_core::models::{normalize_keyword, KeywordSuggestion};
use ash_core::{AshError, AshResult, CrisisLevel};
use ash_observability::tracing_setup::events;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Target of a clear operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearScope {
    Keyword(String),
    All,
    Level(CrisisLevel),
}

impl fmt::Display for ClearScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(f, "keyword:{}", normalize_keyword(keyword)),
            Self::All => f.write_str("all"),
            Self::Level(level) => write!(f, "level:{level}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    ConfidenceDesc,
    NewestFirst,
    Alphabetical,
}

/// Listing filter. The default lists everything by descending confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionFilter {
    pub level: Option<CrisisLevel>,
    pub min_confidence: Option<f64>,
    pub urgent_only: bool,
    pub sort: SortOrder,
}

impl SuggestionFilter {
    pub fn level(level: CrisisLevel) -> Self {
        Self {
            level: Some(level),
            ..Self::default()
        }
    }

    pub fn urgent() -> Self {
        Self {
            urgent_only: true,
            ..Self::default()
        }
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, suggestion: &KeywordSuggestion) -> bool {
        self.level.map_or(true, |l| suggestion.crisis_level == l)
            && self.min_confidence.map_or(true, |c| suggestion.confidence >= c)
            && (!self.urgent_only || suggestion.urgent)
    }
}

/// Result of [`SuggestionStore::upsert`]. Carries a copy of the stored row.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Inserted(KeywordSuggestion),
    Merged(KeywordSuggestion),
    /// New keyword, but admission was refused. Nothing was stored.
    Rejected,
}

/// Pending suggestions. At most one row per normalized keyword.
#[derive(Debug, Default)]
pub struct SuggestionStore {
    pending: DashMap<String, KeywordSuggestion>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge into an existing row, or insert a new one if `admit` allows it.
    ///
    /// `admit` runs while the keyword's shard is locked, so a quota reserved
    /// there and the insert it pays for happen as one step. It is not called
    /// for merges.
    pub fn upsert(
        &self,
        suggestion: KeywordSuggestion,
        admit: impl FnOnce() -> bool,
    ) -> UpsertOutcome {
        match self.pending.entry(suggestion.keyword.clone()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().merge(suggestion);
                let merged = entry.get().clone();
                events::suggestion_merged(&merged.keyword, merged.confidence, merged.sources.len());
                UpsertOutcome::Merged(merged)
            }
            Entry::Vacant(entry) => {
                if !admit() {
                    return UpsertOutcome::Rejected;
                }
                let inserted = entry.insert(suggestion).clone();
                events::suggestion_discovered(
                    &inserted.keyword,
                    inserted.crisis_level.as_str(),
                    inserted.confidence,
                    inserted.sources.iter().next().map_or("", String::as_str),
                );
                UpsertOutcome::Inserted(inserted)
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<KeywordSuggestion> {
        self.pending
            .get(&normalize_keyword(keyword))
            .map(|r| r.clone())
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.pending.contains_key(&normalize_keyword(keyword))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Snapshot of matching rows in the filter's order. Ties break on keyword.
    pub fn list(&self, filter: &SuggestionFilter) -> Vec<KeywordSuggestion> {
        let mut rows: Vec<KeywordSuggestion> = self
            .pending
            .iter()
            .filter(|r| filter.matches(r.value()))
            .map(|r| r.value().clone())
            .collect();
        rows.sort_by(|a, b| compare(filter.sort, a, b));
        rows
    }

    /// Remove a pending row and hand it back for the external keyword store.
    pub fn promote(&self, keyword: &str) -> AshResult<KeywordSuggestion> {
        let key = normalize_keyword(keyword);
        let (_, suggestion) = self
            .pending
            .remove(&key)
            .ok_or_else(|| AshError::NotFound { keyword: key })?;
        events::suggestion_promoted(&suggestion.keyword, suggestion.crisis_level.as_str());
        Ok(suggestion)
    }

    /// Remove rows and report exactly how many went. A single keyword that
    /// is not pending is `NotFound`; bulk scopes may remove zero.
    pub fn clear(&self, scope: &ClearScope) -> AshResult<usize> {
        let removed = match scope {
            ClearScope::Keyword(keyword) => {
                let key = normalize_keyword(keyword);
                self.pending
                    .remove(&key)
                    .map(|_| 1)
                    .ok_or(AshError::NotFound { keyword: key })?
            }
            ClearScope::All => self.retain_counting(|_| false),
            ClearScope::Level(level) => self.retain_counting(|s| s.crisis_level != *level),
        };
        events::suggestions_cleared(&scope.to_string(), removed);
        Ok(removed)
    }

    fn retain_counting(&self, keep: impl Fn(&KeywordSuggestion) -> bool) -> usize {
        let mut removed = 0;
        self.pending.retain(|_, suggestion| {
            let kept = keep(suggestion);
            if !kept {
                removed += 1;
            }
            kept
        });
        removed
    }
}

fn compare(sort: SortOrder, a: &KeywordSuggestion, b: &KeywordSuggestion) -> Ordering {
    let primary = match sort {
        SortOrder::ConfidenceDesc => b.confidence.total_cmp(&a.confidence),
        SortOrder::NewestFirst => b.discovered_at.cmp(&a.discovered_at),
        SortOrder::Alphabetical => Ordering::Equal,
    };
    primary.then_with(|| a.keyword.cmp(&b.keyword))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn suggestion(keyword: &str, level: CrisisLevel, confidence: f64) -> KeywordSuggestion {
        KeywordSuggestion::new(keyword, level, confidence, "mod@general", "r", None, Utc::now())
    }

    fn seeded() -> SuggestionStore {
        let store = SuggestionStore::new();
        for (k, l, c) in [
            ("numb", CrisisLevel::Medium, 0.7),
            ("end it all", CrisisLevel::High, 0.95),
            ("tired", CrisisLevel::Low, 0.65),
            ("give up", CrisisLevel::Medium, 0.8),
        ] {
            store.upsert(suggestion(k, l, c), || true);
        }
        store
    }

    #[test]
    fn upsert_merges_case_insensitively() {
        let store = SuggestionStore::new();
        store.upsert(suggestion("Give Up", CrisisLevel::Medium, 0.7), || true);
        let outcome = store.upsert(suggestion("give   up", CrisisLevel::Medium, 0.9), || {
            panic!("merge must not ask for admission")
        });
        match outcome {
            UpsertOutcome::Merged(s) => assert_eq!(s.confidence, 0.9),
            other => panic!("expected merge, got {other:?}"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn rejected_admission_stores_nothing() {
        let store = SuggestionStore::new();
        let outcome = store.upsert(suggestion("numb", CrisisLevel::Medium, 0.7), || false);
        assert_eq!(outcome, UpsertOutcome::Rejected);
        assert!(store.is_empty());
    }

    #[test]
    fn default_listing_is_confidence_descending() {
        let keywords: Vec<_> = seeded()
            .list(&SuggestionFilter::default())
            .into_iter()
            .map(|s| s.keyword)
            .collect();
        assert_eq!(keywords, ["end it all", "give up", "numb", "tired"]);
    }

    #[test]
    fn filters_by_level_and_urgency() {
        let store = seeded();
        assert_eq!(store.list(&SuggestionFilter::level(CrisisLevel::Medium)).len(), 2);
        let urgent = store.list(&SuggestionFilter::urgent());
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].keyword, "end it all");
        let confident = SuggestionFilter {
            min_confidence: Some(0.75),
            ..SuggestionFilter::default()
        };
        assert_eq!(store.list(&confident).len(), 2);
    }

    #[test]
    fn alternative_sort_orders() {
        let store = SuggestionStore::new();
        let mut old = suggestion("zebra", CrisisLevel::Low, 0.9);
        old.discovered_at = Utc::now() - Duration::hours(5);
        store.upsert(old, || true);
        store.upsert(suggestion("apple", CrisisLevel::Low, 0.7), || true);

        let alpha = store.list(&SuggestionFilter::default().sorted(SortOrder::Alphabetical));
        assert_eq!(alpha[0].keyword, "apple");
        let newest = store.list(&SuggestionFilter::default().sorted(SortOrder::NewestFirst));
        assert_eq!(newest[0].keyword, "apple");
    }

    #[test]
    fn promote_removes_and_missing_is_not_found() {
        let store = seeded();
        let promoted = store.promote("NUMB").unwrap();
        assert_eq!(promoted.keyword, "numb");
        assert!(!store.contains("numb"));
        assert!(matches!(
            store.promote("numb"),
            Err(AshError::NotFound { .. })
        ));
    }

    #[test]
    fn clear_reports_exact_counts() {
        let store = seeded();
        assert_eq!(store.clear(&ClearScope::Level(CrisisLevel::Medium)).unwrap(), 2);
        assert_eq!(store.clear(&ClearScope::Level(CrisisLevel::Medium)).unwrap(), 0);
        assert_eq!(store.clear(&ClearScope::Keyword("Tired".into())).unwrap(), 1);
        assert!(matches!(
            store.clear(&ClearScope::Keyword("tired".into())),
            Err(AshError::NotFound { .. })
        ));
        assert_eq!(store.clear(&ClearScope::All).unwrap(), 1);
        assert!(store.is_empty());
    }
}
