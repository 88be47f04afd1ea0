pub mod analysis_result;
pub mod crisis_level;
pub mod keyword;
pub mod learning_adjustment;
pub mod signal;
pub mod stats;
pub mod suggestion;

pub use analysis_result::AnalysisResult;
pub use crisis_level::CrisisLevel;
pub use keyword::{KeywordCandidate, KeywordEntry, NlpVerdict};
pub use learning_adjustment::{AdjustmentKind, FeedbackReport, LearningAdjustment};
pub use signal::{MatchedSpan, Signal, SignalSource};
pub use stats::EngineStats;
pub use suggestion::{normalize_keyword, KeywordSuggestion};
