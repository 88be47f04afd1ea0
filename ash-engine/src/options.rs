//! Startup options: where the configuration comes from and whether to
//! install the log subscriber.

use ash_core::{AshConfig, AshResult};
use ash_observability::init_tracing;

/// Options for building the engine's configuration at process start.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// TOML configuration string. If None, uses defaults.
    pub config_toml: Option<String>,
    /// Apply `ASH_*` environment overrides on top of the TOML.
    pub apply_env: bool,
    /// Install the global tracing subscriber from the observability section.
    pub init_logging: bool,
}

impl EngineOptions {
    /// Resolve the configuration: TOML or defaults, then env overrides,
    /// then validation.
    pub fn load_config(&self) -> AshResult<AshConfig> {
        self.load_config_with(|key| std::env::var(key).ok())
    }

    /// [`load_config`](Self::load_config) with an explicit env lookup.
    pub fn load_config_with<F>(&self, lookup: F) -> AshResult<AshConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config_toml {
            Some(toml) => AshConfig::from_toml(toml)?,
            None => AshConfig::default(),
        };
        if self.apply_env {
            config.apply_env_overrides(lookup)?;
        }
        config.validate()?;
        if self.init_logging {
            init_tracing(&config.observability);
        }
        Ok(config)
    }
}
