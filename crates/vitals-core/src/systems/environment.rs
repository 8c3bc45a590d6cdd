//! Environment Coordinator
//!
//! Drifts the two global signals (ambient temperature and environment
//! quality) on a fixed cadence and pushes agent-specific adjustments into
//! every registered, living agent: temperature and environment converge on
//! the globals, and stress accrues from unmet food, water and space needs.
//!
//! Agents are reached through an [`AgentDirectory`] lent to each call, so
//! the set of agents cannot change while a cycle is in progress.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::hash::BuildHasher;

use rand::Rng;
use vitals_events::{AgentId, StatState, StatType, VitalsEvent};

use crate::components::entity_stats::EntityStats;
use crate::config::EnvironmentConfig;
use crate::error::Result;

/// Lower/upper bound of both global signals
pub const GLOBAL_SIGNAL_MIN: f32 = 0.0;
pub const GLOBAL_SIGNAL_MAX: f32 = 100.0;

/// Resolves registered agent ids to their live stat sets.
pub trait AgentDirectory {
    /// Returns `None` when the agent no longer exists.
    fn agent_mut(&mut self, id: &AgentId) -> Option<&mut EntityStats>;
}

impl<S: BuildHasher> AgentDirectory for HashMap<AgentId, EntityStats, S> {
    fn agent_mut(&mut self, id: &AgentId) -> Option<&mut EntityStats> {
        self.get_mut(id)
    }
}

impl AgentDirectory for BTreeMap<AgentId, EntityStats> {
    fn agent_mut(&mut self, id: &AgentId) -> Option<&mut EntityStats> {
        self.get_mut(id)
    }
}

/// Outcome of one coordinator cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleReport {
    /// Agents that received the environmental push
    pub agents_updated: usize,
    /// Registered agents that no longer resolve
    pub agents_missing: usize,
    /// Registered agents skipped because they are dead
    pub agents_dead: usize,
}

/// Process-wide environment driver.
#[derive(Debug, Clone)]
pub struct EnvironmentCoordinator {
    config: EnvironmentConfig,
    global_temperature: f32,
    global_environment: f32,
    /// Seconds since the last cycle
    elapsed: f32,
    agents: BTreeSet<AgentId>,
    pending: Vec<VitalsEvent>,
}

impl Default for EnvironmentCoordinator {
    fn default() -> Self {
        Self::from_valid_config(EnvironmentConfig::default())
    }
}

impl EnvironmentCoordinator {
    /// Creates a coordinator, rejecting an invalid config.
    pub fn new(config: EnvironmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: EnvironmentConfig) -> Self {
        Self {
            global_temperature: clamp_signal(config.initial_temperature),
            global_environment: clamp_signal(config.initial_environment),
            config,
            elapsed: 0.0,
            agents: BTreeSet::new(),
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Adds an agent to the driven set. Returns false if already registered.
    pub fn register(&mut self, id: AgentId) -> bool {
        self.agents.insert(id)
    }

    /// Removes an agent. Returns false if it was not registered.
    pub fn unregister(&mut self, id: &AgentId) -> bool {
        self.agents.remove(id)
    }

    /// Replaces the driven set with a fresh discovery result.
    pub fn refresh(&mut self, ids: impl IntoIterator<Item = AgentId>) {
        self.agents = ids.into_iter().collect();
    }

    pub fn is_registered(&self, id: &AgentId) -> bool {
        self.agents.contains(id)
    }

    pub fn registered(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.iter()
    }

    pub fn registered_count(&self) -> usize {
        self.agents.len()
    }

    pub fn global_temperature(&self) -> f32 {
        self.global_temperature
    }

    pub fn global_environment(&self) -> f32 {
        self.global_environment
    }

    /// Advances the cadence clock and runs a cycle when it is due.
    /// Returns the cycle report if one ran. A negative or non-finite
    /// `delta_time` is ignored.
    pub fn update<D, R>(&mut self, delta_time: f32, agents: &mut D, rng: &mut R) -> Option<CycleReport>
    where
        D: AgentDirectory + ?Sized,
        R: Rng + ?Sized,
    {
        if !delta_time.is_finite() || delta_time < 0.0 {
            return None;
        }
        self.elapsed += delta_time;
        if self.elapsed < self.config.update_interval {
            return None;
        }
        self.elapsed = 0.0;
        Some(self.run_cycle(agents, rng))
    }

    /// Runs one cycle immediately.
    pub fn run_cycle<D, R>(&mut self, agents: &mut D, rng: &mut R) -> CycleReport
    where
        D: AgentDirectory + ?Sized,
        R: Rng + ?Sized,
    {
        let temperature_offset = random_offset(rng, self.config.temperature_variation, self.config.variation_scale);
        let environment_offset = random_offset(rng, self.config.environment_variation, self.config.variation_scale);
        self.global_temperature = clamp_signal(self.global_temperature + temperature_offset);
        self.global_environment = clamp_signal(self.global_environment + environment_offset);

        let mut report = CycleReport::default();
        for id in &self.agents {
            let Some(stats) = agents.agent_mut(id) else {
                report.agents_missing += 1;
                continue;
            };
            if !stats.is_alive() {
                report.agents_dead += 1;
                continue;
            }
            self.push_to_agent(stats);
            report.agents_updated += 1;
        }

        self.pending.push(VitalsEvent::GlobalTemperatureChanged {
            value: self.global_temperature,
        });
        self.pending.push(VitalsEvent::GlobalEnvironmentChanged {
            value: self.global_environment,
        });

        tracing::debug!(
            temperature = self.global_temperature,
            environment = self.global_environment,
            updated = report.agents_updated,
            missing = report.agents_missing,
            dead = report.agents_dead,
            "Environment cycle"
        );
        report
    }

    fn push_to_agent(&self, stats: &mut EntityStats) {
        if let Some(current) = stats.stat_value(StatType::Temperature) {
            let delta = convergence_delta(current, self.global_temperature, self.config.convergence_rate);
            stats.modify_stat(StatType::Temperature, delta);
        }
        if let Some(current) = stats.stat_value(StatType::Environment) {
            let delta = convergence_delta(current, self.global_environment, self.config.convergence_rate);
            stats.modify_stat(StatType::Environment, delta);
        }

        let stress = stress_delta(stats, &self.config);
        if stress != 0.0 {
            stats.modify_stat(StatType::Stress, stress);
        }
    }

    /// Notifications raised since the last drain, oldest first.
    pub fn pending_events(&self) -> &[VitalsEvent] {
        &self.pending
    }

    pub fn drain_events(&mut self) -> Vec<VitalsEvent> {
        std::mem::take(&mut self.pending)
    }
}

fn clamp_signal(value: f32) -> f32 {
    value.clamp(GLOBAL_SIGNAL_MIN, GLOBAL_SIGNAL_MAX)
}

fn random_offset<R: Rng + ?Sized>(rng: &mut R, variation: f32, scale: f32) -> f32 {
    if variation <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-variation..=variation) * scale
}

/// A fixed fraction of the gap; never overshoots for rates in [0, 1].
pub fn convergence_delta(current: f32, target: f32, rate: f32) -> f32 {
    (target - current) * rate
}

/// Net stress change for one cycle: penalties for each Bad need, or relief
/// when food, water and space are all Good.
pub fn stress_delta(stats: &EntityStats, config: &EnvironmentConfig) -> f32 {
    let state = |stat| stats.get_stat(stat).map(|s| s.state());

    let mut delta = 0.0;
    if state(StatType::Food) == Some(StatState::Bad) {
        delta += config.food_stress;
    }
    if state(StatType::Water) == Some(StatState::Bad) {
        delta += config.water_stress;
    }
    if state(StatType::Space) == Some(StatState::Bad) {
        delta += config.space_stress;
    }

    let all_good = [StatType::Food, StatType::Water, StatType::Space]
        .into_iter()
        .all(|stat| state(stat) == Some(StatState::Good));
    if all_good {
        delta -= config.stress_relief;
    }
    delta
}
