//! Configuration: TOML file, `ASH_*` environment overrides, validated defaults.

pub mod defaults;
mod engine_config;
mod nlp_config;
mod observability_config;
mod sensitivity_config;

pub use engine_config::{ConfigField, ConfigValue, EngineConfig};
pub use nlp_config::NlpConfig;
pub use observability_config::ObservabilityConfig;
pub use sensitivity_config::SensitivityConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{AshError, AshResult};

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AshConfig {
    pub engine: EngineConfig,
    pub nlp: NlpConfig,
    pub sensitivity: SensitivityConfig,
    pub observability: ObservabilityConfig,
}

impl AshConfig {
    /// Parse a (possibly partial) TOML document. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> AshResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| AshError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(&mut self) -> AshResult<()> {
        self.apply_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `ASH_*` overrides read through `lookup`. All-or-nothing: on any
    /// malformed or out-of-range value `self` is left untouched.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AshResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut next = self.clone();

        for field in ConfigField::ALL {
            let key = format!("ASH_{}", field.as_str().to_ascii_uppercase());
            if let Some(raw) = lookup(&key) {
                let value = ConfigValue::parse_for(field, &raw)
                    .map_err(|e| AshError::ConfigError(format!("{key}: {e}")))?;
                next.engine = next
                    .engine
                    .with_update(field, value)
                    .map_err(|e| AshError::ConfigError(format!("{key}: {e}")))?;
            }
        }

        if let Some(raw) = lookup("ASH_NLP_TIMEOUT_MS") {
            next.nlp.timeout_ms = raw.trim().parse().map_err(|_| {
                AshError::ConfigError(format!("ASH_NLP_TIMEOUT_MS: {raw:?} is not an integer"))
            })?;
        }
        if let Some(raw) = lookup("ASH_LOG_LEVEL") {
            next.observability.log_level = raw.trim().to_ascii_lowercase();
        }
        if let Some(raw) = lookup("ASH_LOG_FORMAT") {
            next.observability.log_format = raw.trim().to_ascii_lowercase();
        }

        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Range-check every section.
    pub fn validate(&self) -> AshResult<()> {
        self.engine.validate()?;

        if self.nlp.timeout_ms == 0 {
            return Err(AshError::ConfigError(
                "nlp.timeout_ms must be greater than 0".to_string(),
            ));
        }

        let s = &self.sensitivity;
        let bounds_ok = s.min_multiplier.is_finite()
            && s.max_multiplier.is_finite()
            && s.min_multiplier > 0.0
            && s.min_multiplier <= 1.0
            && s.max_multiplier >= 1.0;
        if !bounds_ok {
            return Err(AshError::ConfigError(format!(
                "sensitivity bounds [{}, {}] must bracket 1.0 and be positive",
                s.min_multiplier, s.max_multiplier
            )));
        }
        if !(s.step.is_finite() && s.step > 0.0) {
            return Err(AshError::ConfigError(format!(
                "sensitivity.step {} must be positive",
                s.step
            )));
        }

        if !matches!(self.observability.log_format.as_str(), "human" | "json") {
            return Err(AshError::ConfigError(format!(
                "observability.log_format {:?} must be \"human\" or \"json\"",
                self.observability.log_format
            )));
        }
        Ok(())
    }
}
