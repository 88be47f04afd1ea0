//! # ash-engine
//!
//! [`CrisisEngine`] is constructed once at process start and shared by
//! handle. It owns the suggestion store, quota counters, sensitivity table,
//! and live configuration behind its own synchronization, and exposes the
//! review surface as typed request/response calls.

pub mod engine;
pub mod options;

pub use ash_core::models::{EngineStats, FeedbackReport};
pub use ash_discovery::{ClearScope, DiscoveryRequest, SortOrder, SuggestionFilter};
pub use engine::CrisisEngine;
pub use options::EngineOptions;
