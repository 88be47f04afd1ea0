//! # ash-quota
//!
//! The single owner of daily counters. Every discovery and learning admission
//! goes through [`QuotaManager::try_reserve`]; nothing else mutates a counter.

pub mod counters;
pub mod manager;

pub use counters::{DailyCounters, QuotaCounter, QuotaStatus};
pub use manager::{QuotaLimits, QuotaManager};
