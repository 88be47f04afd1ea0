//! # ash-core
//!
//! Foundation crate for the Ash crisis-keyword engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use clock::{Clock, SystemClock};
pub use config::{AshConfig, ConfigField, ConfigValue, EngineConfig};
pub use errors::{AshError, AshResult, NlpError};
pub use models::{
    AnalysisResult, CrisisLevel, KeywordSuggestion, LearningAdjustment, Signal, SignalSource,
};
