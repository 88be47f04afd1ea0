use std::future::Future;

use crate::errors::NlpError;
use crate::models::{CrisisLevel, KeywordCandidate};

/// NLP keyword discovery (`ExtractKeywordCandidates`).
pub trait IKeywordExtractor: Send + Sync {
    fn extract_keyword_candidates(
        &self,
        text: &str,
        asserted_level: CrisisLevel,
    ) -> impl Future<Output = Result<Vec<KeywordCandidate>, NlpError>> + Send;
}
