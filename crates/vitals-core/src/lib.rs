//! Agent Vitals Engine Library
//!
//! Per-agent vital stats (health, food, water, stress, environment,
//! temperature, space) with passive variation cycles, a death condition, and
//! a process-wide environment coordinator that pulls registered agents
//! toward shared global signals.

pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod output;
pub mod setup;
pub mod simulation;
pub mod systems;

pub use components::*;
pub use config::VitalsConfig;
pub use error::{ConfigError, Result};
pub use simulation::Simulation;
pub use systems::{AgentDirectory, CycleReport, EnvironmentCoordinator};

pub use vitals_events::{AgentId, StatState, StatType, VitalsEvent};
