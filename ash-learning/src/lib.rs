//! # ash-learning
//!
//! Reviewer corrections nudge the sensitivity table the ensemble resolver
//! reads. Admission is gated by a confidence threshold and a daily cap;
//! every report that passes validation lands in the audit log.

pub mod audit;
pub mod processor;

pub use audit::AuditLog;
pub use processor::FeedbackProcessor;
