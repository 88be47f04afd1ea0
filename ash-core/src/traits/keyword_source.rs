use crate::models::KeywordEntry;

/// Read-only view of the externally owned active keyword set.
pub trait IKeywordSource: Send + Sync {
    fn keyword_list(&self) -> Vec<KeywordEntry>;
}
