use serde::{Deserialize, Serialize};

use super::defaults;

/// Bounds for the per-class NLP weight multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensitivityConfig {
    pub min_multiplier: f64,
    pub max_multiplier: f64,
    /// Full-confidence adjustment size; scaled by report confidence.
    pub step: f64,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            min_multiplier: defaults::DEFAULT_SENSITIVITY_MIN,
            max_multiplier: defaults::DEFAULT_SENSITIVITY_MAX,
            step: defaults::DEFAULT_SENSITIVITY_STEP,
        }
    }
}
