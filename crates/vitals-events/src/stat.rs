//! Stat Identity Types
//!
//! The fixed set of vital stats an agent can carry, and the derived
//! Good/Bad state of a stat value.
//!
//! # Example
//!
//! ```
//! use vitals_events::StatType;
//!
//! let stat: StatType = "temperature".parse().unwrap();
//! assert_eq!(stat, StatType::Temperature);
//! assert_eq!(stat.to_string(), "temperature");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the vital stats tracked per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Health,
    Food,
    Water,
    Stress,
    Environment,
    Temperature,
    Space,
}

impl StatType {
    /// Returns all stat types in declaration order.
    pub fn all() -> &'static [StatType] {
        &[
            StatType::Health,
            StatType::Food,
            StatType::Water,
            StatType::Stress,
            StatType::Environment,
            StatType::Temperature,
            StatType::Space,
        ]
    }

    /// Returns the snake_case name used in config files and event logs.
    pub fn as_str(self) -> &'static str {
        match self {
            StatType::Health => "health",
            StatType::Food => "food",
            StatType::Water => "water",
            StatType::Stress => "stress",
            StatType::Environment => "environment",
            StatType::Temperature => "temperature",
            StatType::Space => "space",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a StatType from a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseStatTypeError(pub String);

impl fmt::Display for ParseStatTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown stat type: '{}'", self.0)
    }
}

impl std::error::Error for ParseStatTypeError {}

impl FromStr for StatType {
    type Err = ParseStatTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        StatType::all()
            .iter()
            .copied()
            .find(|stat| stat.as_str() == lowered)
            .ok_or_else(|| ParseStatTypeError(s.to_string()))
    }
}

/// Whether a stat value sits inside its baseline band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatState {
    #[default]
    Good,
    Bad,
}

impl StatState {
    pub fn is_good(self) -> bool {
        matches!(self, StatState::Good)
    }

    pub fn is_bad(self) -> bool {
        matches!(self, StatState::Bad)
    }
}

impl fmt::Display for StatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatState::Good => write!(f, "good"),
            StatState::Bad => write!(f, "bad"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_type_display() {
        assert_eq!(StatType::Health.to_string(), "health");
        assert_eq!(StatType::Environment.to_string(), "environment");
        assert_eq!(StatType::Space.to_string(), "space");
    }

    #[test]
    fn test_stat_type_parse() {
        assert_eq!("food".parse::<StatType>().unwrap(), StatType::Food);
        assert_eq!("WATER".parse::<StatType>().unwrap(), StatType::Water);
        assert_eq!(" stress ".parse::<StatType>().unwrap(), StatType::Stress);
        assert!("mood".parse::<StatType>().is_err());
    }

    #[test]
    fn test_every_stat_type_parses_its_own_name() {
        for stat in StatType::all() {
            assert_eq!(stat.as_str().parse::<StatType>().unwrap(), *stat);
        }
    }

    #[test]
    fn test_stat_type_serialization() {
        assert_eq!(serde_json::to_string(&StatType::Temperature).unwrap(), r#""temperature""#);
        let parsed: StatType = serde_json::from_str(r#""space""#).unwrap();
        assert_eq!(parsed, StatType::Space);
    }

    #[test]
    fn test_stat_state_flags() {
        assert!(StatState::Good.is_good());
        assert!(!StatState::Good.is_bad());
        assert!(StatState::Bad.is_bad());
        assert_eq!(StatState::default(), StatState::Good);
    }

    #[test]
    fn test_parse_error_message() {
        let err = "mood".parse::<StatType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown stat type: 'mood'");
    }
}
