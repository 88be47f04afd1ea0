//! Ensemble resolver: merge filtered keyword and NLP votes into one verdict.
//!
//! 1. Any keyword signal still at `High` after filtering forces `High`.
//! 2. Otherwise the level is the maximum over keyword levels and the NLP
//!    level, where the NLP signal only votes once its sensitivity-scaled
//!    weight reaches [`NLP_VOTE_FLOOR`].
//! 3. Confidence is the noisy-OR of the weights that agree with the final
//!    level, `1 - Π(1 - wᵢ)`, floored at the keyword-only confidence so an
//!    NLP vote that raises the level never lowers confidence.
//! 4. Without an NLP signal, confidence is capped at
//!    [`DEGRADED_CONFIDENCE_CEILING`].

use ash_core::constants::{DEGRADED_CONFIDENCE_CEILING, NLP_VOTE_FLOOR};
use ash_core::models::{AnalysisResult, Signal, SignalSource};
use ash_core::CrisisLevel;

use crate::sensitivity::SensitivityTable;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleResolver;

impl EnsembleResolver {
    pub fn new() -> Self {
        Self
    }

    /// `degraded` means the gateway omitted the NLP signal.
    pub fn resolve(
        &self,
        mut signals: Vec<Signal>,
        degraded: bool,
        sensitivity: &SensitivityTable,
    ) -> AnalysisResult {
        for signal in signals.iter_mut().filter(|s| s.is_nlp()) {
            signal.weight = sensitivity.scale(signal.level, signal.weight);
        }

        let keyword_level = signals
            .iter()
            .filter(|s| s.is_keyword())
            .map(|s| s.level)
            .max()
            .unwrap_or(CrisisLevel::None);
        let nlp_vote = signals
            .iter()
            .find(|s| s.is_nlp() && s.weight >= NLP_VOTE_FLOOR)
            .map(|s| s.level);

        let level = if keyword_level == CrisisLevel::High {
            CrisisLevel::High
        } else {
            keyword_level.max(nlp_vote.unwrap_or(CrisisLevel::None))
        };

        let keyword_confidence = noisy_or(
            signals
                .iter()
                .filter(|s| s.is_keyword() && s.level == keyword_level)
                .map(|s| s.weight),
        );
        let agreeing = signals.iter().filter(|s| match s.source {
            SignalSource::Keyword => s.level == level,
            SignalSource::NlpModel => nlp_vote == Some(level),
            SignalSource::ContextFilter => false,
        });
        let mut confidence = noisy_or(agreeing.map(|s| s.weight)).max(keyword_confidence);
        if degraded {
            confidence = confidence.min(DEGRADED_CONFIDENCE_CEILING);
        }

        AnalysisResult {
            level,
            confidence,
            contributing_signals: signals,
            degraded,
        }
    }
}

/// `1 - Π(1 - wᵢ)`, clamped to [0, 1]. Monotonic in every weight.
pub fn noisy_or(weights: impl IntoIterator<Item = f64>) -> f64 {
    let miss: f64 = weights
        .into_iter()
        .map(|w| 1.0 - w.clamp(0.0, 1.0))
        .product();
    (1.0 - miss).clamp(0.0, 1.0)
}
