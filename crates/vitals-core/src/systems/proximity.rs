//! Proximity Index
//!
//! Caller-side crowding lookup: agents sharing a location count as nearby.
//! Feeds the `nearby_count` argument of `EntityStats::recompute_space`.

use std::collections::HashMap;

use vitals_events::AgentId;

/// Index of agents by location for nearby-count queries
#[derive(Debug, Default, Clone)]
pub struct AgentsByLocation {
    /// Maps location index -> agent IDs present
    locations: HashMap<usize, Vec<AgentId>>,
}

impl AgentsByLocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from `(agent, location)` pairs.
    pub fn build<'a>(placements: impl IntoIterator<Item = (&'a AgentId, usize)>) -> Self {
        let mut index = Self::new();
        for (agent_id, location) in placements {
            index.add(location, agent_id.clone());
        }
        index
    }

    /// Get agents at a specific location
    pub fn at_location(&self, location: usize) -> &[AgentId] {
        self.locations
            .get(&location)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get the number of agents at a location
    pub fn count_at(&self, location: usize) -> usize {
        self.at_location(location).len()
    }

    /// Agents at the same location, excluding the agent itself
    pub fn nearby_count(&self, location: usize, agent_id: &AgentId) -> usize {
        self.at_location(location)
            .iter()
            .filter(|id| *id != agent_id)
            .count()
    }

    /// Add an agent to a location
    pub fn add(&mut self, location: usize, agent_id: AgentId) {
        self.locations.entry(location).or_default().push(agent_id);
    }
}
