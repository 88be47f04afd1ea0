use std::collections::HashMap;

use ash_core::config::*;
use ash_core::AshError;
use proptest::prelude::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AshConfig::from_toml("").unwrap();

    assert_eq!(config.engine.min_confidence, 0.6);
    assert_eq!(config.engine.max_daily_discoveries, 10);
    assert!(config.engine.discovery_enabled);
    assert_eq!(config.engine.max_learning_adjustments_per_day, 50);
    assert_eq!(config.engine.learning_confidence_threshold, 0.6);

    assert_eq!(config.nlp.timeout_ms, 3_000);

    assert_eq!(config.sensitivity.min_multiplier, 0.5);
    assert_eq!(config.sensitivity.max_multiplier, 1.5);

    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.observability.log_format, "human");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[engine]
max_daily_discoveries = 3
discovery_enabled = false

[nlp]
timeout_ms = 1500
"#;
    let config = AshConfig::from_toml(toml).unwrap();
    assert_eq!(config.engine.max_daily_discoveries, 3);
    assert!(!config.engine.discovery_enabled);
    assert_eq!(config.nlp.timeout_ms, 1500);
    // Non-overridden fields keep defaults
    assert_eq!(config.engine.min_confidence, 0.6);
}

#[test]
fn config_rejects_out_of_range_toml() {
    let err = AshConfig::from_toml("[engine]\nmin_confidence = 1.5\n").unwrap_err();
    assert!(matches!(err, AshError::ValidationError { .. }));
}

#[test]
fn config_rejects_malformed_toml() {
    let err = AshConfig::from_toml("[engine\n").unwrap_err();
    assert!(matches!(err, AshError::ConfigError(_)));
}

#[test]
fn config_rejects_unknown_log_format() {
    let err = AshConfig::from_toml("[observability]\nlog_format = \"xml\"\n").unwrap_err();
    assert!(err.to_string().contains("log_format"));
}

#[test]
fn env_overrides_apply_with_type_coercion() {
    let mut config = AshConfig::default();
    config
        .apply_env_overrides(env(&[
            ("ASH_MIN_CONFIDENCE", "0.75"),
            ("ASH_DISCOVERY_ENABLED", "no"),
            ("ASH_MAX_DAILY_DISCOVERIES", "25"),
            ("ASH_NLP_TIMEOUT_MS", "500"),
            ("ASH_LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

    assert_eq!(config.engine.min_confidence, 0.75);
    assert!(!config.engine.discovery_enabled);
    assert_eq!(config.engine.max_daily_discoveries, 25);
    assert_eq!(config.nlp.timeout_ms, 500);
    assert_eq!(config.observability.log_format, "json");
}

#[test]
fn bad_env_override_leaves_config_untouched() {
    let mut config = AshConfig::default();
    let err = config
        .apply_env_overrides(env(&[
            ("ASH_MAX_DAILY_DISCOVERIES", "5"),
            ("ASH_LEARNING_CONFIDENCE_THRESHOLD", "2.0"),
        ]))
        .unwrap_err();

    assert!(matches!(err, AshError::ConfigError(_)));
    assert_eq!(config, AshConfig::default());
}

proptest! {
    #[test]
    fn in_range_confidence_is_always_accepted(v in 0.0f64..=1.0) {
        let next = EngineConfig::default()
            .with_update(ConfigField::MinConfidence, ConfigValue::Float(v));
        prop_assert!(next.is_ok());
        prop_assert_eq!(next.unwrap().min_confidence, v);
    }

    #[test]
    fn out_of_range_confidence_is_always_rejected(
        v in prop_oneof![-100.0f64..-0.0001, 1.0001f64..100.0],
    ) {
        let config = EngineConfig::default();
        let result =
            config.with_update(ConfigField::LearningConfidenceThreshold, ConfigValue::Float(v));
        prop_assert!(result.is_err());
        prop_assert_eq!(config, EngineConfig::default());
    }
}
