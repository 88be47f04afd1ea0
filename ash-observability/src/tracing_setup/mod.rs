//! Tracing setup: structured logging in human or JSON form.

pub mod events;

use std::str::FromStr;
use std::sync::Once;

use ash_core::config::ObservabilityConfig;
use ash_core::AshError;
use tracing_subscriber::EnvFilter;

/// Env var holding a full `EnvFilter` directive, e.g. `ash_discovery=debug,info`.
pub const LOG_ENV_VAR: &str = "ASH_LOG";

static INIT: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = AshError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(AshError::validation(
                "log_format",
                format!("unknown log format '{other}'"),
            )),
        }
    }
}

/// `ASH_LOG` when set and valid, otherwise the configured level.
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Idempotent; a subscriber installed by the
/// host process is left in place.
pub fn init_tracing(config: &ObservabilityConfig) {
    let format: LogFormat = config.log_format.parse().unwrap_or_default();
    let level = config.log_level.clone();
    INIT.call_once(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(build_filter(&level))
            .with_target(true)
            .with_thread_ids(true);
        let _ = match format {
            LogFormat::Human => builder.try_init(),
            LogFormat::Json => builder.json().with_current_span(false).try_init(),
        };
    });
}

/// Initialize with an explicit filter string (tests, embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .json()
        .try_init();
}
