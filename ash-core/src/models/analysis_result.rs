use serde::{Deserialize, Serialize};

use super::{CrisisLevel, Signal};

/// Final verdict for one message. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub level: CrisisLevel,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub contributing_signals: Vec<Signal>,
    /// True when the NLP signal was unavailable and only keywords were used.
    pub degraded: bool,
}

impl AnalysisResult {
    pub fn is_crisis(&self) -> bool {
        self.level.is_crisis()
    }

    /// The NLP signal, if the model answered.
    pub fn nlp_signal(&self) -> Option<&Signal> {
        self.contributing_signals.iter().find(|s| s.is_nlp())
    }
}
