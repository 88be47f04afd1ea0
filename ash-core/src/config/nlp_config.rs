use serde::{Deserialize, Serialize};

use super::defaults;

/// NLP collaborator call settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpConfig {
    /// Ceiling applied to every inference and extraction call.
    pub timeout_ms: u64,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: defaults::DEFAULT_NLP_TIMEOUT_MS,
        }
    }
}
