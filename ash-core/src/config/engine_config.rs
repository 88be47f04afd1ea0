//! Runtime-tunable engine configuration and its validated update path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::{AshError, AshResult};

/// Admission-control settings. Mutated only through [`EngineConfig::with_update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Candidates below this confidence are dropped during discovery.
    pub min_confidence: f64,
    /// Daily cap on newly inserted suggestions.
    pub max_daily_discoveries: u32,
    pub discovery_enabled: bool,
    /// Daily cap on applied learning adjustments.
    pub max_learning_adjustments_per_day: u32,
    /// Reports below this confidence are rejected unless overridden.
    pub learning_confidence_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
            max_daily_discoveries: defaults::DEFAULT_MAX_DAILY_DISCOVERIES,
            discovery_enabled: defaults::DEFAULT_DISCOVERY_ENABLED,
            max_learning_adjustments_per_day: defaults::DEFAULT_MAX_LEARNING_ADJUSTMENTS_PER_DAY,
            learning_confidence_threshold: defaults::DEFAULT_LEARNING_CONFIDENCE_THRESHOLD,
        }
    }
}

impl EngineConfig {
    /// Check every field's range.
    pub fn validate(&self) -> AshResult<()> {
        check_unit_interval(ConfigField::MinConfidence, self.min_confidence)?;
        check_positive(ConfigField::MaxDailyDiscoveries, self.max_daily_discoveries)?;
        check_positive(
            ConfigField::MaxLearningAdjustmentsPerDay,
            self.max_learning_adjustments_per_day,
        )?;
        check_unit_interval(
            ConfigField::LearningConfidenceThreshold,
            self.learning_confidence_threshold,
        )?;
        Ok(())
    }

    /// Return a copy with one field changed. `self` is never modified, so a
    /// rejected value leaves the previous config intact.
    pub fn with_update(&self, field: ConfigField, value: ConfigValue) -> AshResult<Self> {
        let mut next = self.clone();
        match field {
            ConfigField::MinConfidence => next.min_confidence = value.as_f64(field)?,
            ConfigField::MaxDailyDiscoveries => next.max_daily_discoveries = value.as_u32(field)?,
            ConfigField::DiscoveryEnabled => next.discovery_enabled = value.as_bool(field)?,
            ConfigField::MaxLearningAdjustmentsPerDay => {
                next.max_learning_adjustments_per_day = value.as_u32(field)?
            }
            ConfigField::LearningConfidenceThreshold => {
                next.learning_confidence_threshold = value.as_f64(field)?
            }
        }
        next.validate()?;
        Ok(next)
    }
}

fn check_unit_interval(field: ConfigField, value: f64) -> AshResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AshError::validation(
            field.as_str(),
            format!("{value} is outside [0.0, 1.0]"),
        ))
    }
}

fn check_positive(field: ConfigField, value: u32) -> AshResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(AshError::validation(field.as_str(), "must be greater than 0"))
    }
}

/// The runtime-updatable fields of [`EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigField {
    MinConfidence,
    MaxDailyDiscoveries,
    DiscoveryEnabled,
    MaxLearningAdjustmentsPerDay,
    LearningConfidenceThreshold,
}

impl ConfigField {
    pub const ALL: [ConfigField; 5] = [
        Self::MinConfidence,
        Self::MaxDailyDiscoveries,
        Self::DiscoveryEnabled,
        Self::MaxLearningAdjustmentsPerDay,
        Self::LearningConfidenceThreshold,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MinConfidence => "min_confidence",
            Self::MaxDailyDiscoveries => "max_daily_discoveries",
            Self::DiscoveryEnabled => "discovery_enabled",
            Self::MaxLearningAdjustmentsPerDay => "max_learning_adjustments_per_day",
            Self::LearningConfidenceThreshold => "learning_confidence_threshold",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigField {
    type Err = AshError;

    /// Accepts snake_case and camelCase spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().replace('_', "") == folded)
            .ok_or_else(|| AshError::validation(s, "unknown configuration field"))
    }
}

/// A typed configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl ConfigValue {
    /// Parse a raw string into the type the field expects.
    pub fn parse_for(field: ConfigField, raw: &str) -> AshResult<Self> {
        let raw = raw.trim();
        let invalid =
            |what: &str| AshError::validation(field.as_str(), format!("{raw:?} is not {what}"));
        match field {
            ConfigField::DiscoveryEnabled => parse_bool(raw)
                .map(Self::Bool)
                .ok_or_else(|| invalid("a boolean")),
            ConfigField::MaxDailyDiscoveries | ConfigField::MaxLearningAdjustmentsPerDay => raw
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|_| invalid("an integer")),
            ConfigField::MinConfidence | ConfigField::LearningConfidenceThreshold => raw
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| invalid("a number")),
        }
    }

    fn as_f64(self, field: ConfigField) -> AshResult<f64> {
        match self {
            Self::Float(v) => Ok(v),
            Self::Integer(v) => Ok(v as f64),
            Self::Bool(_) => Err(AshError::validation(field.as_str(), "expected a number")),
        }
    }

    fn as_u32(self, field: ConfigField) -> AshResult<u32> {
        match self {
            Self::Integer(v) => u32::try_from(v).map_err(|_| {
                AshError::validation(field.as_str(), format!("{v} is out of range"))
            }),
            _ => Err(AshError::validation(field.as_str(), "expected an integer")),
        }
    }

    fn as_bool(self, field: ConfigField) -> AshResult<bool> {
        match self {
            Self::Bool(v) => Ok(v),
            _ => Err(AshError::validation(field.as_str(), "expected a boolean")),
        }
    }
}

/// Loose boolean parsing shared with env overrides.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
