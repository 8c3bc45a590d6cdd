//! Configuration System
//!
//! Loads vitals tuning from a TOML file. Every section and field has a
//! default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::definition::{StatDefinition, StatDefinitions};
use crate::components::entity_stats::vitals_constants::{
    DEFAULT_BAD_STATS_FOR_DEATH, DEFAULT_MAX_LIFESPAN,
};
use crate::error::{ConfigError, Result};

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "vitals.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitalsConfig {
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl VitalsConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.stats.validate()?;
        self.environment.validate()?;
        self.simulation.validate()
    }
}

/// Per-agent stat rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Number of simultaneously Bad stats that meets the death condition
    pub bad_stats_for_death: usize,
    /// Seconds an agent lives before dying of age
    pub max_lifespan: f32,
    /// Stat definitions; empty means the built-in table
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<StatDefinition>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            bad_stats_for_death: DEFAULT_BAD_STATS_FOR_DEATH,
            max_lifespan: DEFAULT_MAX_LIFESPAN,
            definitions: Vec::new(),
        }
    }
}

impl StatsConfig {
    /// Builds the shared definition set for a run.
    pub fn build_definitions(&self) -> Result<StatDefinitions> {
        StatDefinitions::from_definitions(self.definitions.iter().cloned())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_lifespan > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "stats.max_lifespan",
                value: self.max_lifespan,
            });
        }
        self.build_definitions().map(|_| ())
    }
}

/// Environment coordinator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Seconds between coordinator cycles
    pub update_interval: f32,
    pub initial_temperature: f32,
    pub initial_environment: f32,
    /// Half-width of the random temperature perturbation, before scaling
    pub temperature_variation: f32,
    /// Half-width of the random environment perturbation, before scaling
    pub environment_variation: f32,
    /// Multiplier applied to both random perturbations
    pub variation_scale: f32,
    /// Fraction of the gap to the global signal closed per cycle
    pub convergence_rate: f32,
    /// Stress added when Food is Bad
    pub food_stress: f32,
    /// Stress added when Water is Bad
    pub water_stress: f32,
    /// Stress added when Space is Bad
    pub space_stress: f32,
    /// Stress removed when Food, Water and Space are all Good
    pub stress_relief: f32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            update_interval: 1.0,
            initial_temperature: 50.0,
            initial_environment: 50.0,
            temperature_variation: 10.0,
            environment_variation: 10.0,
            variation_scale: 0.1,
            convergence_rate: 0.1,
            food_stress: 0.5,
            water_stress: 0.5,
            space_stress: 0.3,
            stress_relief: 0.1,
        }
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.update_interval > 0.0) || !self.update_interval.is_finite() {
            return Err(ConfigError::InvalidInterval {
                what: "environment.update_interval".to_string(),
                value: self.update_interval,
            });
        }

        let non_negative = [
            ("environment.temperature_variation", self.temperature_variation),
            ("environment.environment_variation", self.environment_variation),
            ("environment.variation_scale", self.variation_scale),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.convergence_rate) {
            return Err(ConfigError::InvalidParameter {
                name: "environment.convergence_rate",
                value: self.convergence_rate,
            });
        }
        Ok(())
    }
}

/// Headless runner parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    /// Agents spawned at start
    pub agents: usize,
    /// Simulated seconds to run
    pub duration: f32,
    /// Fixed step in seconds
    pub dt: f32,
    /// Number of locations agents are spread over
    pub locations: usize,
    /// Per-step probability that an agent moves to a random location
    pub wander_chance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            agents: 50,
            duration: 300.0,
            dt: 1.0,
            locations: 8,
            wander_chance: 0.05,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(ConfigError::InvalidInterval {
                what: "simulation.dt".to_string(),
                value: self.dt,
            });
        }
        if !(0.0..=1.0).contains(&self.wander_chance) {
            return Err(ConfigError::InvalidParameter {
                name: "simulation.wander_chance",
                value: self.wander_chance as f32,
            });
        }
        Ok(())
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Agent vitals configuration

[stats]
bad_stats_for_death = 2
max_lifespan = 600.0

# Uncomment to replace the built-in stat table. Listing any definition
# replaces the whole table, so list every stat the agents should carry.
# [[stats.definitions]]
# stat = "food"
# baseline_min = 50.0
# baseline_max = 100.0
# absolute_min = 0.0
# absolute_max = 100.0
# variation_amount = -1.0
# variation_interval = 10.0
# affected_by_external = false

[environment]
update_interval = 1.0
initial_temperature = 50.0
initial_environment = 50.0
temperature_variation = 10.0
environment_variation = 10.0
variation_scale = 0.1
convergence_rate = 0.1
food_stress = 0.5
water_stress = 0.5
space_stress = 0.3
stress_relief = 0.1

[simulation]
seed = 42
agents = 50
duration = 300.0
dt = 1.0
locations = 8
wander_chance = 0.05
"#
    .to_string()
}
