//! Entity Stats
//!
//! An agent's full stat set: lookup, bounded mutation, timed variation,
//! space recomputation and death-condition evaluation.
//!
//! Notifications are buffered in emission order and drained by the caller
//! with [`EntityStats::drain_events`]. Nothing is delivered through
//! callbacks, so a handler can never re-enter a mutation in progress.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use vitals_events::{AgentId, StatType, VitalsEvent};

use super::definition::{StatDefinition, StatDefinitions};
use super::stat::Stat;
use crate::config::StatsConfig;
use crate::systems::variation::VariationTracker;

/// Defaults and space-recompute thresholds
pub mod vitals_constants {
    /// Number of simultaneously Bad stats that meets the death condition
    pub const DEFAULT_BAD_STATS_FOR_DEATH: usize = 2;
    /// Seconds an agent lives before dying of age
    pub const DEFAULT_MAX_LIFESPAN: f32 = 600.0;
    /// More nearby agents than this is crowding
    pub const CROWDED_NEARBY_COUNT: usize = 10;
    /// Fewer nearby agents than this is open space
    pub const OPEN_NEARBY_COUNT: usize = 2;
    /// Space change per recompute cycle
    pub const SPACE_STEP: f32 = 1.0;
}

use vitals_constants::*;

/// The stat set of one agent.
#[derive(Debug, Clone)]
pub struct EntityStats {
    agent_id: AgentId,
    definitions: StatDefinitions,
    stats: BTreeMap<StatType, Stat>,
    current_age: f32,
    max_lifespan: f32,
    bad_stats_for_death: usize,
    timers: VariationTracker,
    rng: SmallRng,
    pending: Vec<VitalsEvent>,
}

impl EntityStats {
    /// Creates a stat set from the built-in definitions.
    pub fn new(agent_id: AgentId, rng: SmallRng) -> Self {
        Self::with_definitions(agent_id, StatDefinitions::defaults(), rng)
    }

    /// Creates a stat set sharing the given definitions.
    pub fn with_definitions(agent_id: AgentId, definitions: StatDefinitions, rng: SmallRng) -> Self {
        let mut stats = Self {
            agent_id,
            definitions,
            stats: BTreeMap::new(),
            current_age: 0.0,
            max_lifespan: DEFAULT_MAX_LIFESPAN,
            bad_stats_for_death: DEFAULT_BAD_STATS_FOR_DEATH,
            timers: VariationTracker::new(),
            rng,
            pending: Vec::new(),
        };
        stats.initialize_stats();
        stats
    }

    /// Creates a stat set using the thresholds in `config`.
    ///
    /// `definitions` should be built once from the same config and shared
    /// across every agent of the run.
    pub fn from_config(
        agent_id: AgentId,
        config: &StatsConfig,
        definitions: &StatDefinitions,
        rng: SmallRng,
    ) -> Self {
        Self::with_definitions(agent_id, definitions.clone(), rng)
            .with_max_lifespan(config.max_lifespan)
            .with_bad_stats_for_death(config.bad_stats_for_death)
    }

    pub fn with_max_lifespan(mut self, max_lifespan: f32) -> Self {
        self.max_lifespan = max_lifespan;
        self
    }

    pub fn with_bad_stats_for_death(mut self, threshold: usize) -> Self {
        self.bad_stats_for_death = threshold;
        self
    }

    /// (Re)builds every stat at a random baseline value and zeroes all
    /// variation timers. Age is left untouched.
    pub fn initialize_stats(&mut self) {
        self.stats.clear();
        for def in self.definitions.iter() {
            let stat = Stat::with_random_value(def.clone(), &mut self.rng);
            self.stats.insert(def.stat_type(), stat);
        }
        self.timers.reset();
    }

    /// Zero age and reinitialize all stats.
    pub fn reset(&mut self) {
        self.current_age = 0.0;
        self.initialize_stats();
        tracing::info!(agent = %self.agent_id, "Reset vitals");
    }

    pub fn agent_id(&self) -> &AgentId {
        &self.agent_id
    }

    pub fn definitions(&self) -> &StatDefinitions {
        &self.definitions
    }

    pub fn get_stat(&self, stat: StatType) -> Option<&Stat> {
        self.stats.get(&stat)
    }

    pub fn stat_value(&self, stat: StatType) -> Option<f32> {
        self.stats.get(&stat).map(Stat::value)
    }

    pub fn stats(&self) -> impl Iterator<Item = &Stat> {
        self.stats.values()
    }

    /// Bounded add. No-op if the stat is not configured or `delta` is not
    /// finite.
    pub fn modify_stat(&mut self, stat: StatType, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let Some(entry) = self.stats.get_mut(&stat) else {
            return;
        };
        let value = entry.add(delta);
        tracing::trace!(agent = %self.agent_id, %stat, delta, value, "Modified stat");

        self.pending.push(VitalsEvent::StatChanged { stat, value });
        self.check_death_condition();
    }

    /// Bounded set (absolute band only). No-op if the stat is not configured
    /// or `value` is not finite.
    pub fn set_stat(&mut self, stat: StatType, value: f32) {
        if !value.is_finite() {
            return;
        }
        let Some(entry) = self.stats.get_mut(&stat) else {
            return;
        };
        let value = entry.set(value);
        tracing::trace!(agent = %self.agent_id, %stat, value, "Set stat");

        self.pending.push(VitalsEvent::StatChanged { stat, value });
        self.check_death_condition();
    }

    /// Advances age and every passive variation clock by `delta_time`.
    ///
    /// A stat whose clock reaches its interval gets its variation amount
    /// applied and its clock restarted. Death conditions are evaluated once
    /// afterwards, whether or not anything changed. A negative or non-finite
    /// `delta_time` is ignored, so age never decreases.
    pub fn tick(&mut self, delta_time: f32) {
        if !is_valid_step(delta_time) {
            return;
        }
        self.current_age += delta_time;

        for def in self.definitions.iter() {
            if !is_passive_source(def) {
                continue;
            }
            let stat_type = def.stat_type();
            let Some(stat) = self.stats.get_mut(&stat_type) else {
                continue;
            };

            self.timers.advance(stat_type, delta_time);
            if !self.timers.is_due(stat_type, def.variation_interval()) {
                continue;
            }
            self.timers.mark_applied(stat_type);

            let amount = def.variation_amount();
            if amount == 0.0 {
                continue;
            }
            let value = stat.add(amount);
            tracing::debug!(agent = %self.agent_id, stat = %stat_type, amount, value, "Variation cycle");
            self.pending.push(VitalsEvent::StatChanged {
                stat: stat_type,
                value,
            });
        }

        self.check_death_condition();
    }

    /// Advances the space clock and, once it reaches Space's interval,
    /// nudges Space by the crowding around the agent: down when more than
    /// ten others are nearby, up when fewer than two are, otherwise left
    /// alone. The clock restarts either way.
    pub fn recompute_space(&mut self, nearby_count: usize, delta_time: f32) {
        if !is_valid_step(delta_time) {
            return;
        }
        let Some(interval) = self
            .definitions
            .get(StatType::Space)
            .map(|def| def.variation_interval())
        else {
            return;
        };
        if interval <= 0.0 || !self.stats.contains_key(&StatType::Space) {
            return;
        }

        self.timers.advance(StatType::Space, delta_time);
        if !self.timers.is_due(StatType::Space, interval) {
            return;
        }
        self.timers.mark_applied(StatType::Space);

        let delta = space_delta(nearby_count);
        if delta == 0.0 {
            return;
        }
        let Some(space) = self.stats.get_mut(&StatType::Space) else {
            return;
        };
        let before = space.value();
        let value = space.add(delta);
        tracing::debug!(agent = %self.agent_id, nearby_count, value, "Recomputed space");

        if value != before {
            self.pending.push(VitalsEvent::StatChanged {
                stat: StatType::Space,
                value,
            });
            self.check_death_condition();
        }
    }

    /// Every stat currently in Bad state, in stat order.
    pub fn get_bad_stats(&self) -> Vec<StatType> {
        self.stats
            .values()
            .filter(|stat| stat.is_bad())
            .map(Stat::stat_type)
            .collect()
    }

    /// Level-triggered: emits on every evaluation while the threshold is met.
    fn check_death_condition(&mut self) {
        let bad_stats = self.get_bad_stats();
        if bad_stats.len() >= self.bad_stats_for_death {
            tracing::debug!(agent = %self.agent_id, ?bad_stats, "Death condition met");
            self.pending.push(VitalsEvent::DeathConditionMet { bad_stats });
        }
    }

    /// Health above zero and age below the lifespan. A stat set without a
    /// Health stat is never alive.
    pub fn is_alive(&self) -> bool {
        self.health().map_or(false, |health| health > 0.0) && self.current_age < self.max_lifespan
    }

    /// Compatibility accessor reading through to the Health stat.
    pub fn health(&self) -> Option<f32> {
        self.stat_value(StatType::Health)
    }

    pub fn current_age(&self) -> f32 {
        self.current_age
    }

    pub fn max_lifespan(&self) -> f32 {
        self.max_lifespan
    }

    pub fn bad_stats_for_death(&self) -> usize {
        self.bad_stats_for_death
    }

    pub fn set_bad_stats_for_death(&mut self, threshold: usize) {
        self.bad_stats_for_death = threshold;
    }

    /// Seconds accumulated on a stat's variation clock.
    pub fn variation_timer(&self, stat: StatType) -> f32 {
        self.timers.elapsed(stat)
    }

    /// Notifications raised since the last drain, oldest first.
    pub fn pending_events(&self) -> &[VitalsEvent] {
        &self.pending
    }

    pub fn drain_events(&mut self) -> Vec<VitalsEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Stats driven by `tick`. Space keeps an interval but is driven by
/// `recompute_space` instead.
fn is_passive_source(def: &StatDefinition) -> bool {
    def.has_variation_cycle() && def.stat_type() != StatType::Space
}

fn is_valid_step(delta_time: f32) -> bool {
    delta_time.is_finite() && delta_time >= 0.0
}

fn space_delta(nearby_count: usize) -> f32 {
    if nearby_count > CROWDED_NEARBY_COUNT {
        -SPACE_STEP
    } else if nearby_count < OPEN_NEARBY_COUNT {
        SPACE_STEP
    } else {
        0.0
    }
}
