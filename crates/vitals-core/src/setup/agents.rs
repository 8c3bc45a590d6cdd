//! Agent Spawning
//!
//! Builds a population of agents with their own seeded stat sets and a
//! starting location each.

use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use vitals_events::AgentId;

use crate::components::definition::StatDefinitions;
use crate::components::entity_stats::EntityStats;
use crate::config::StatsConfig;
use crate::systems::environment::AgentDirectory;
use crate::systems::proximity::AgentsByLocation;

/// Large prime used to derive independent per-agent seeds
const RNG_DERIVATION_PRIME: u64 = 6_364_136_223_846_793_005;

/// Derive a sub-RNG for a specific agent, ensuring independent streams.
pub fn derive_agent_rng(base_seed: u64, index: usize) -> SmallRng {
    SmallRng::seed_from_u64(base_seed.wrapping_add((index as u64).wrapping_mul(RNG_DERIVATION_PRIME)))
}

/// Live agents and where they are.
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: BTreeMap<AgentId, EntityStats>,
    locations: BTreeMap<AgentId, usize>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stats: EntityStats, location: usize) {
        let id = stats.agent_id().clone();
        self.locations.insert(id.clone(), location);
        self.agents.insert(id, stats);
    }

    /// Removes an agent; returns its final stats if it was present.
    pub fn remove(&mut self, id: &AgentId) -> Option<EntityStats> {
        self.locations.remove(id);
        self.agents.remove(id)
    }

    pub fn get(&self, id: &AgentId) -> Option<&EntityStats> {
        self.agents.get(id)
    }

    pub fn get_mut(&mut self, id: &AgentId) -> Option<&mut EntityStats> {
        self.agents.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &AgentId> {
        self.agents.keys()
    }

    pub fn agents(&self) -> impl Iterator<Item = &EntityStats> {
        self.agents.values()
    }

    pub fn agents_mut(&mut self) -> impl Iterator<Item = &mut EntityStats> {
        self.agents.values_mut()
    }

    pub fn location_of(&self, id: &AgentId) -> Option<usize> {
        self.locations.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Snapshot of who is where, for nearby counts.
    pub fn location_index(&self) -> AgentsByLocation {
        AgentsByLocation::build(self.locations.iter().map(|(id, &loc)| (id, loc)))
    }

    /// Moves each agent to a random location with probability `chance`.
    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R, location_count: usize, chance: f64) {
        if location_count == 0 {
            return;
        }
        for location in self.locations.values_mut() {
            if rng.gen_bool(chance) {
                *location = rng.gen_range(0..location_count);
            }
        }
    }
}

impl AgentDirectory for Population {
    fn agent_mut(&mut self, id: &AgentId) -> Option<&mut EntityStats> {
        self.agents.get_mut(id)
    }
}

/// Spawns `count` agents sharing `definitions`, spread over
/// `location_count` locations drawn from `placement_rng`. Agent stat seeds
/// derive from `seed`, so the same inputs always produce the same population.
pub fn spawn_population<R: Rng + ?Sized>(
    count: usize,
    location_count: usize,
    stats_config: &StatsConfig,
    definitions: &StatDefinitions,
    seed: u64,
    placement_rng: &mut R,
) -> Population {
    let mut population = Population::new();

    for index in 1..=count {
        let id = AgentId::numbered(index);
        let stats = EntityStats::from_config(id, stats_config, definitions, derive_agent_rng(seed, index));
        let location = if location_count > 0 {
            placement_rng.gen_range(0..location_count)
        } else {
            0
        };
        population.insert(stats, location);
    }

    tracing::info!(agents = population.len(), locations = location_count, "Spawned population");
    population
}
