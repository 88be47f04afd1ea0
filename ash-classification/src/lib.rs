//! # ash-classification
//!
//! message → gateway (keyword match + NLP call) → context filter → ensemble
//! resolver → `AnalysisResult`. Classification never fails: when the NLP
//! collaborator is unavailable the resolver runs in keyword-only mode.

pub mod classifier;
pub mod context;
pub mod ensemble;
pub mod gateway;
pub mod sensitivity;

pub use classifier::Classifier;
pub use context::{ContextAdjustment, ContextFilter};
pub use ensemble::EnsembleResolver;
pub use gateway::{ClassificationGateway, GatewayOutput, KeywordMatcher, NlpOutcome};
pub use sensitivity::{SensitivityTable, SharedSensitivity};
