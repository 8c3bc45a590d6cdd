//! Headless Run Loop
//!
//! Fixed-step driver tying the population, the proximity index and the
//! environment coordinator together. Each step:
//!
//! 1. agents wander between locations
//! 2. every agent ticks and recomputes Space from its nearby count
//! 3. the coordinator advances and possibly runs a cycle
//! 4. buffered notifications are logged
//! 5. agents that met the death condition or stopped living are removed
//!    and unregistered

use rand::rngs::SmallRng;
use rand::SeedableRng;
use vitals_events::{AgentId, VitalsEvent};

use crate::components::definition::StatDefinitions;
use crate::components::entity_stats::EntityStats;
use crate::config::VitalsConfig;
use crate::error::Result;
use crate::events::EventLogger;
use crate::output::stats::{DeathCause, DeathRecord, PopulationStats, SimulationStats, StatsCollector};
use crate::setup::agents::{spawn_population, Population};
use crate::systems::environment::EnvironmentCoordinator;

pub struct Simulation {
    config: VitalsConfig,
    definitions: StatDefinitions,
    population: Population,
    coordinator: EnvironmentCoordinator,
    rng: SmallRng,
    logger: EventLogger,
    collector: StatsCollector,
    time: f32,
    steps: u64,
    spawned: usize,
}

impl Simulation {
    /// Spawns the configured population and registers every agent with a
    /// fresh coordinator.
    pub fn new(config: VitalsConfig, logger: EventLogger) -> Result<Self> {
        config.validate()?;
        let definitions = config.stats.build_definitions()?;
        let mut coordinator = EnvironmentCoordinator::new(config.environment.clone())?;
        let mut rng = SmallRng::seed_from_u64(config.simulation.seed);

        let population = spawn_population(
            config.simulation.agents,
            config.simulation.locations,
            &config.stats,
            &definitions,
            config.simulation.seed,
            &mut rng,
        );
        coordinator.refresh(population.ids().cloned());

        Ok(Self {
            spawned: population.len(),
            config,
            definitions,
            population,
            coordinator,
            rng,
            logger,
            collector: StatsCollector::new(),
            time: 0.0,
            steps: 0,
        })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn coordinator(&self) -> &EnvironmentCoordinator {
        &self.coordinator
    }

    pub fn definitions(&self) -> &StatDefinitions {
        &self.definitions
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn deaths(&self) -> &[DeathRecord] {
        &self.collector.deaths
    }

    pub fn is_finished(&self) -> bool {
        self.time >= self.config.simulation.duration || self.population.is_empty()
    }

    /// Advances the run by one fixed step. Returns the removals it caused.
    pub fn step(&mut self) -> Result<Vec<DeathRecord>> {
        let dt = self.config.simulation.dt;
        self.time += dt;
        self.steps += 1;

        self.population.wander(
            &mut self.rng,
            self.config.simulation.locations,
            self.config.simulation.wander_chance,
        );

        let index = self.population.location_index();
        let placements: Vec<(AgentId, usize)> = self
            .population
            .ids()
            .filter_map(|id| self.population.location_of(id).map(|loc| (id.clone(), loc)))
            .collect();
        for (id, location) in &placements {
            let nearby = index.nearby_count(*location, id);
            if let Some(stats) = self.population.get_mut(id) {
                stats.tick(dt);
                stats.recompute_space(nearby, dt);
            }
        }

        if self
            .coordinator
            .update(dt, &mut self.population, &mut self.rng)
            .is_some()
        {
            self.collector.record_cycle();
        }

        for event in self.coordinator.drain_events() {
            self.collector.record_event(&event);
            self.logger.log(self.time, None, event)?;
        }

        let mut removals = Vec::new();
        for stats in self.population.agents_mut() {
            let mut death_condition = None;
            for event in stats.drain_events() {
                if let VitalsEvent::DeathConditionMet { bad_stats } = &event {
                    death_condition = Some(bad_stats.clone());
                }
                self.collector.record_event(&event);
                self.logger.log(self.time, Some(stats.agent_id()), event)?;
            }

            if let Some(cause) = death_condition
                .map(|bad| DeathCause::BadStats { stats: bad })
                .or_else(|| lifecycle_cause(stats))
            {
                removals.push(DeathRecord {
                    agent: stats.agent_id().clone(),
                    time: self.time,
                    age: stats.current_age(),
                    cause,
                });
            }
        }

        for death in &removals {
            self.population.remove(&death.agent);
            self.coordinator.unregister(&death.agent);
            tracing::debug!(agent = %death.agent, cause = ?death.cause, "Agent removed");
            self.collector.record_death(death.clone());
        }

        Ok(removals)
    }

    /// Steps until the configured duration elapses or nobody is left.
    pub fn run(&mut self) -> Result<SimulationStats> {
        while !self.is_finished() {
            let removals = self.step()?;
            if !removals.is_empty() {
                tracing::info!(
                    time = self.time,
                    removed = removals.len(),
                    alive = self.population.len(),
                    "Agents died"
                );
            }
        }
        self.logger.flush()?;
        Ok(self.summary())
    }

    pub fn summary(&self) -> SimulationStats {
        SimulationStats {
            seed: self.config.simulation.seed,
            elapsed: self.time,
            steps: self.steps,
            spawned: self.spawned,
            total_events: self.collector.total_events,
            events_by_kind: self.collector.events_by_kind.clone(),
            environment_cycles: self.collector.environment_cycles,
            final_temperature: self.coordinator.global_temperature(),
            final_environment: self.coordinator.global_environment(),
            deaths: self.collector.deaths.clone(),
            population: PopulationStats::collect(&self.population),
        }
    }
}

fn lifecycle_cause(stats: &EntityStats) -> Option<DeathCause> {
    if stats.is_alive() {
        None
    } else if stats.health().map_or(true, |health| health <= 0.0) {
        Some(DeathCause::Health)
    } else {
        Some(DeathCause::OldAge)
    }
}
