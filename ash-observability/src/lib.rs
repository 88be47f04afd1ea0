//! # ash-observability
//!
//! Subscriber setup, one structured event per engine operation, and the
//! degradation tracker that records NLP outages.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use tracing_setup::{init_tracing, LogFormat};
