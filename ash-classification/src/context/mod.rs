//! Context filter: down-rank or veto signals whose crisis vocabulary appears
//! in a non-crisis context. A rule may lower a signal by one tier or remove
//! it; it never raises a level.

pub mod rules;

use ash_core::models::{MatchedSpan, Signal, SignalSource};
use ash_core::CrisisLevel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Verdict of a single context rule. Ordered by strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextAdjustment {
    Keep,
    Demote,
    Veto,
}

/// `(normalized text, matched span) -> adjustment`.
pub type ContextRule = fn(&str, Option<&MatchedSpan>) -> ContextAdjustment;

/// Ordered set of named rules. The strongest adjustment across rules wins,
/// so several demoting rules still lower a signal by a single tier.
#[derive(Debug, Clone)]
pub struct ContextFilter {
    rules: Vec<(&'static str, ContextRule)>,
}

impl Default for ContextFilter {
    fn default() -> Self {
        Self {
            rules: vec![
                ("idiom", rules::idiom),
                ("game_reference", rules::game_reference),
                ("humor_marker", rules::humor_marker),
            ],
        }
    }
}

impl ContextFilter {
    pub fn new(rules: Vec<(&'static str, ContextRule)>) -> Self {
        Self { rules }
    }

    /// Strongest adjustment any rule asks for, with the rule's name.
    pub fn evaluate(
        &self,
        text: &str,
        span: Option<&MatchedSpan>,
    ) -> (ContextAdjustment, Option<&'static str>) {
        self.rules
            .iter()
            .map(|(name, rule)| (rule(text, span), Some(*name)))
            .max_by_key(|(adjustment, _)| *adjustment)
            .filter(|(adjustment, _)| *adjustment != ContextAdjustment::Keep)
            .unwrap_or((ContextAdjustment::Keep, None))
    }

    /// Apply the rules to every vote. Adjusted votes are followed by a
    /// zero-weight `ContextFilter` marker recording the resulting level.
    /// Keyword signals demoted to `None` are dropped.
    pub fn filter(&self, text: &str, signals: Vec<Signal>) -> Vec<Signal> {
        let mut out = Vec::with_capacity(signals.len());
        for mut signal in signals {
            if signal.source == SignalSource::ContextFilter {
                out.push(signal);
                continue;
            }
            let (adjustment, rule) = self.evaluate(text, signal.matched.as_ref());
            let before = signal.level;
            let after = match adjustment {
                ContextAdjustment::Keep => {
                    out.push(signal);
                    continue;
                }
                ContextAdjustment::Demote => before.demote(),
                ContextAdjustment::Veto => CrisisLevel::None,
            };
            debug!(
                rule = rule.unwrap_or_default(),
                source = ?signal.source,
                from = %before,
                to = %after,
                "context filter adjusted signal"
            );
            let marker = Signal {
                source: SignalSource::ContextFilter,
                level: after,
                weight: 0.0,
                matched: signal.matched.clone(),
            };
            let keep = match adjustment {
                ContextAdjustment::Veto => false,
                _ => signal.is_nlp() || after > CrisisLevel::None,
            };
            if keep {
                signal.level = after;
                out.push(signal);
            }
            out.push(marker);
        }
        out
    }
}
