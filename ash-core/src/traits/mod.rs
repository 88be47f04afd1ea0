//! Capability contracts the engine requires from its collaborators.
//!
//! Each one is either supplied fully initialized at construction or the
//! engine cannot be built; nothing is probed at call time.

mod inference;
mod keyword_extractor;
mod keyword_source;

pub use inference::ICrisisInference;
pub use keyword_extractor::IKeywordExtractor;
pub use keyword_source::IKeywordSource;
