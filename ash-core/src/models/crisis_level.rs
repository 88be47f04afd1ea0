use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants;

/// Ordered crisis severity tier. `None < Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CrisisLevel {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl CrisisLevel {
    pub const ALL: [CrisisLevel; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// One tier lower, saturating at `None`.
    pub fn demote(self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low | Self::None => Self::None,
        }
    }

    /// Fixed signal weight for a keyword matched at this tier.
    pub fn keyword_weight(self) -> f64 {
        match self {
            Self::High => constants::KEYWORD_WEIGHT_HIGH,
            Self::Medium => constants::KEYWORD_WEIGHT_MEDIUM,
            Self::Low => constants::KEYWORD_WEIGHT_LOW,
            Self::None => 0.0,
        }
    }

    pub fn is_crisis(self) -> bool {
        self > Self::None
    }
}

impl fmt::Display for CrisisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrisisLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown crisis level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(CrisisLevel::None < CrisisLevel::Low);
        assert!(CrisisLevel::Low < CrisisLevel::Medium);
        assert!(CrisisLevel::Medium < CrisisLevel::High);
    }

    #[test]
    fn demote_saturates_at_none() {
        assert_eq!(CrisisLevel::High.demote(), CrisisLevel::Medium);
        assert_eq!(CrisisLevel::None.demote(), CrisisLevel::None);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("HIGH".parse::<CrisisLevel>().unwrap(), CrisisLevel::High);
        assert!("severe".parse::<CrisisLevel>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CrisisLevel::High).unwrap(), "\"high\"");
        let level: CrisisLevel = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(level, CrisisLevel::Medium);
    }
}
