//! Error types for configuration loading and validation.
//!
//! The engine itself has no runtime failure paths; everything here is
//! caller-input validation or IO.

use thiserror::Error;
use vitals_events::StatType;

/// Which band of a stat definition failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Baseline,
    Absolute,
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Band::Baseline => write!(f, "baseline"),
            Band::Absolute => write!(f, "absolute"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("{stat}: {band} range is inverted or not finite ({min}..{max})")]
    InvalidRange {
        stat: StatType,
        band: Band,
        min: f32,
        max: f32,
    },

    #[error("{stat}: baseline range {baseline:?} lies outside absolute range {absolute:?}")]
    BaselineOutsideAbsolute {
        stat: StatType,
        baseline: (f32, f32),
        absolute: (f32, f32),
    },

    #[error("invalid interval for {what}: {value}")]
    InvalidInterval { what: String, value: f32 },

    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    #[error("stat {0} is defined more than once")]
    DuplicateStat(StatType),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
