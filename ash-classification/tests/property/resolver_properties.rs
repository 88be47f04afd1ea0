use ash_classification::context::ContextFilter;
use ash_classification::ensemble::{noisy_or, EnsembleResolver};
use ash_classification::gateway::{normalize_text, KeywordMatcher};
use ash_classification::SensitivityTable;
use ash_core::constants::DEGRADED_CONFIDENCE_CEILING;
use ash_core::models::{KeywordEntry, MatchedSpan, Signal, SignalSource};
use ash_core::CrisisLevel;
use proptest::prelude::*;

fn level() -> impl Strategy<Value = CrisisLevel> {
    prop_oneof![
        Just(CrisisLevel::None),
        Just(CrisisLevel::Low),
        Just(CrisisLevel::Medium),
        Just(CrisisLevel::High),
    ]
}

fn keyword_signal(level: CrisisLevel) -> Signal {
    Signal::keyword(
        level,
        MatchedSpan {
            pattern: "x".into(),
            start: 0,
            end: 1,
        },
    )
}

proptest! {
    #[test]
    fn level_never_below_strongest_keyword(
        kw in prop::collection::vec(level(), 0..4),
        nlp_level in level(),
        nlp_conf in 0.0f64..=1.0,
    ) {
        let mut signals: Vec<Signal> = kw.iter().copied().map(keyword_signal).collect();
        signals.push(Signal::nlp(nlp_level, nlp_conf));
        let result = EnsembleResolver::new().resolve(signals, false, &SensitivityTable::default());
        let strongest = kw.iter().copied().max().unwrap_or(CrisisLevel::None);
        prop_assert!(result.level >= strongest);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn degraded_confidence_is_capped(kw in prop::collection::vec(level(), 0..6)) {
        let signals = kw.into_iter().map(keyword_signal).collect();
        let result = EnsembleResolver::new().resolve(signals, true, &SensitivityTable::default());
        prop_assert!(result.confidence <= DEGRADED_CONFIDENCE_CEILING);
    }

    #[test]
    fn noisy_or_is_monotonic(
        weights in prop::collection::vec(0.0f64..=1.0, 0..6),
        extra in 0.0f64..=1.0,
    ) {
        let base = noisy_or(weights.iter().copied());
        let more = noisy_or(weights.iter().copied().chain(std::iter::once(extra)));
        prop_assert!(more + 1e-12 >= base);
    }

    #[test]
    fn resolved_confidence_is_monotonic_in_nlp_confidence(
        kw in prop::collection::vec(level(), 0..4),
        nlp_level in level(),
        low in 0.0f64..=1.0,
        high in 0.0f64..=1.0,
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let resolve = |nlp_conf: f64| {
            let mut signals: Vec<Signal> = kw.iter().copied().map(keyword_signal).collect();
            signals.push(Signal::nlp(nlp_level, nlp_conf));
            EnsembleResolver::new().resolve(signals, false, &SensitivityTable::default())
        };
        let weaker = resolve(low);
        let stronger = resolve(high);
        prop_assert!(
            stronger.confidence + 1e-12 >= weaker.confidence,
            "confidence fell from {} to {} as nlp confidence rose from {} to {}",
            weaker.confidence,
            stronger.confidence,
            low,
            high
        );
    }

    #[test]
    fn context_filter_never_raises_a_level(text in "[a-z ]{0,60}", nlp_level in level()) {
        let normalized = normalize_text(&text);
        let matcher = KeywordMatcher::new(&[
            KeywordEntry::new("die", CrisisLevel::High),
            KeywordEntry::new("lol", CrisisLevel::Low),
        ]);
        let mut signals = matcher.match_signals(&normalized);
        signals.push(Signal::nlp(nlp_level, 0.8));
        let before = signals.iter().map(|s| s.level).max().unwrap_or(CrisisLevel::None);

        let filtered = ContextFilter::default().filter(&normalized, signals);
        let after = filtered
            .iter()
            .filter(|s| s.source != SignalSource::ContextFilter)
            .map(|s| s.level)
            .max()
            .unwrap_or(CrisisLevel::None);
        prop_assert!(after <= before);
    }
}
