//! Append-only record of learning reports, applied or rejected.

use std::sync::{Mutex, MutexGuard, PoisonError};

use ash_core::models::LearningAdjustment;

#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<LearningAdjustment>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LearningAdjustment>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, adjustment: LearningAdjustment) {
        self.lock().push(adjustment);
    }

    /// Every entry in report order.
    pub fn history(&self) -> Vec<LearningAdjustment> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.lock().iter().filter(|a| a.applied).count()
    }

    /// Entries applied through the team override.
    pub fn overridden(&self) -> Vec<LearningAdjustment> {
        self.lock()
            .iter()
            .filter(|a| a.threshold_overridden)
            .cloned()
            .collect()
    }
}
