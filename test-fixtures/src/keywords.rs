use std::sync::RwLock;

use ash_core::models::KeywordEntry;
use ash_core::traits::IKeywordSource;
use ash_core::CrisisLevel;

/// In-memory keyword store.
#[derive(Debug, Default)]
pub struct StaticKeywords {
    entries: RwLock<Vec<KeywordEntry>>,
}

impl StaticKeywords {
    pub fn new(entries: Vec<KeywordEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// The golden active keyword list.
    pub fn from_fixture() -> Self {
        Self::new(crate::load_fixture("golden/keywords/active_keywords.json"))
    }

    /// Add a keyword, as the external store does on promotion.
    pub fn add(&self, pattern: &str, level: CrisisLevel) {
        self.entries
            .write()
            .unwrap()
            .push(KeywordEntry::new(pattern, level));
    }

    pub fn keyword_count(&self) -> usize {
        self.entries.read().unwrap().len()
    }
}

impl IKeywordSource for StaticKeywords {
    fn keyword_list(&self) -> Vec<KeywordEntry> {
        self.entries.read().unwrap().clone()
    }
}
