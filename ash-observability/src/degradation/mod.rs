//! Degradation tracking for the NLP collaborator.

pub mod tracker;

pub use tracker::{
    DegradationEvent, DegradationTracker, RecoveryStatus, TrackedDegradation, MAX_TRACKED,
};
