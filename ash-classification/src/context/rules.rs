//! Non-crisis context heuristics. Each rule is a pure function of the
//! normalized text and the span that produced the signal (`None` for the
//! NLP signal, which covers the whole message).

use regex::Regex;
use std::sync::LazyLock;

use ash_core::models::MatchedSpan;

use super::ContextAdjustment;

macro_rules! context_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// ── Idioms that contain crisis vocabulary ─────────────────────────────────
context_pattern!(
    RE_IDIOM,
    r"\b(?:dying (?:of|from) (?:laughter|laughing|embarrassment|boredom)|dying to (?:see|know|try|watch|hear|meet|get|play|read|go)|killing it|killed it|to die for|dead tired|bored to death|scared to death|(?:i'm|im) dead\b(?: lol| lmao|😂)|kill (?:for|me now) (?:a |some )?(?:coffee|pizza|nap|sleep))"
);

// ── Game / media references ────────────────────────────────────────────────
context_pattern!(
    RE_GAME,
    r"\b(?:boss fight|boss battle|respawn(?:ed|ing)?|raid|pvp|speedrun|dungeon|noob|gg|level up|final level|game over|in (?:the|this) game|my character|this episode|new episode|season finale|the movie|the show)\b"
);

// ── Humor markers ──────────────────────────────────────────────────────────
context_pattern!(RE_HUMOR, r"(?:\b(?:lol|lmao|lmfao|rofl|jk|haha+|hehe)\b|/s\b|😂|🤣|😆)");

// ── Explicit seriousness cancels humor/game down-ranking ───────────────────
context_pattern!(
    RE_SERIOUS,
    r"\b(?:not (?:joking|kidding)|i mean it|seriously|for real|no joke)\b"
);

fn matches(re: &LazyLock<Option<Regex>>, text: &str) -> bool {
    re.as_ref().is_some_and(|r| r.is_match(text))
}

/// Veto a keyword match that sits inside a known idiom ("dying of laughter").
/// For the whole-message NLP signal an idiom only down-ranks.
pub fn idiom(text: &str, span: Option<&MatchedSpan>) -> ContextAdjustment {
    let Some(re) = RE_IDIOM.as_ref() else {
        return ContextAdjustment::Keep;
    };
    match span {
        Some(span) => {
            let covered = re
                .find_iter(text)
                .any(|m| m.start() <= span.start && span.end <= m.end());
            if covered {
                ContextAdjustment::Veto
            } else {
                ContextAdjustment::Keep
            }
        }
        None if re.is_match(text) => ContextAdjustment::Demote,
        None => ContextAdjustment::Keep,
    }
}

/// Down-rank when the message talks about a game or show.
pub fn game_reference(text: &str, _span: Option<&MatchedSpan>) -> ContextAdjustment {
    if matches(&RE_GAME, text) && !matches(&RE_SERIOUS, text) {
        ContextAdjustment::Demote
    } else {
        ContextAdjustment::Keep
    }
}

/// Down-rank when the message carries a joke marker.
pub fn humor_marker(text: &str, _span: Option<&MatchedSpan>) -> ContextAdjustment {
    if matches(&RE_HUMOR, text) && !matches(&RE_SERIOUS, text) {
        ContextAdjustment::Demote
    } else {
        ContextAdjustment::Keep
    }
}
