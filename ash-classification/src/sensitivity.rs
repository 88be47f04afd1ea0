//! Sensitivity weighting table: per-class multipliers on the NLP vote.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use ash_core::config::SensitivityConfig;
use ash_core::models::AdjustmentKind;
use ash_core::CrisisLevel;
use serde::{Deserialize, Serialize};

/// Multipliers keyed by pattern class (the crisis level the NLP vote names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityTable {
    multipliers: BTreeMap<CrisisLevel, f64>,
    bounds: SensitivityConfig,
}

impl SensitivityTable {
    pub fn new(bounds: SensitivityConfig) -> Self {
        Self {
            multipliers: BTreeMap::new(),
            bounds,
        }
    }

    /// Current multiplier; 1.0 for classes never adjusted.
    pub fn multiplier(&self, class: CrisisLevel) -> f64 {
        self.multipliers.get(&class).copied().unwrap_or(1.0)
    }

    /// Scale an NLP weight by its class multiplier, clamped to [0, 1].
    pub fn scale(&self, class: CrisisLevel, weight: f64) -> f64 {
        (weight * self.multiplier(class)).clamp(0.0, 1.0)
    }

    /// Nudge one class: false positives lower it, false negatives raise it,
    /// by `step * confidence`, clamped to the configured bounds. The `None`
    /// class is fixed at 1.0. Returns the new multiplier.
    pub fn adjust(&mut self, kind: AdjustmentKind, class: CrisisLevel, confidence: f64) -> f64 {
        if class == CrisisLevel::None {
            return 1.0;
        }
        let delta = self.bounds.step * confidence.clamp(0.0, 1.0);
        let current = self.multiplier(class);
        let next = match kind {
            AdjustmentKind::FalsePositive => current - delta,
            AdjustmentKind::FalseNegative => current + delta,
        }
        .clamp(self.bounds.min_multiplier, self.bounds.max_multiplier);
        self.multipliers.insert(class, next);
        next
    }

    pub fn multipliers(&self) -> &BTreeMap<CrisisLevel, f64> {
        &self.multipliers
    }
}

impl Default for SensitivityTable {
    fn default() -> Self {
        Self::new(SensitivityConfig::default())
    }
}

/// The table shared between classification (readers) and learning (writer).
/// Readers clone a snapshot, so they never observe a half-applied update.
#[derive(Debug, Default)]
pub struct SharedSensitivity {
    table: RwLock<SensitivityTable>,
}

impl SharedSensitivity {
    pub fn new(table: SensitivityTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }

    pub fn snapshot(&self) -> SensitivityTable {
        self.table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Run `f` under the write lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut SensitivityTable) -> R) -> R {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut table)
    }
}
