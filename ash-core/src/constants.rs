/// Ash engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Confidence ceiling applied when classification runs on keyword signals alone.
pub const DEGRADED_CONFIDENCE_CEILING: f64 = 0.6;

/// Minimum sensitivity-scaled NLP weight for the model to vote on the level.
pub const NLP_VOTE_FLOOR: f64 = 0.3;

/// Keyword signal weight per matched tier.
pub const KEYWORD_WEIGHT_HIGH: f64 = 0.9;
pub const KEYWORD_WEIGHT_MEDIUM: f64 = 0.7;
pub const KEYWORD_WEIGHT_LOW: f64 = 0.5;

/// Maximum characters of the original message kept on a suggestion.
pub const MESSAGE_EXCERPT_CHARS: usize = 100;

/// Component name used for NLP degradation tracking.
pub const NLP_COMPONENT: &str = "nlp_collaborator";
