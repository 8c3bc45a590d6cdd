//! Statistics Output
//!
//! Collects run statistics for the end-of-run summary.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use vitals_events::{AgentId, StatType, VitalsEvent};

use crate::setup::agents::Population;

/// Why an agent was removed from the run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum DeathCause {
    /// Too many stats were Bad at once
    BadStats { stats: Vec<StatType> },
    /// Health reached zero
    Health,
    /// Reached the maximum lifespan
    OldAge,
}

/// One removal
#[derive(Debug, Clone, Serialize)]
pub struct DeathRecord {
    pub agent: AgentId,
    pub time: f32,
    pub age: f32,
    #[serde(flatten)]
    pub cause: DeathCause,
}

/// Per-stat snapshot across the living population
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatSummary {
    pub average: f32,
    pub min: f32,
    pub max: f32,
    /// Living agents whose value is outside the baseline band
    pub bad_count: usize,
}

/// Snapshot of the living population
#[derive(Debug, Clone, Default, Serialize)]
pub struct PopulationStats {
    pub alive: usize,
    pub average_age: f32,
    pub stats: BTreeMap<StatType, StatSummary>,
}

impl PopulationStats {
    pub fn collect(population: &Population) -> Self {
        let alive = population.len();
        if alive == 0 {
            return Self::default();
        }

        let mut sums: BTreeMap<StatType, (f32, StatSummary)> = BTreeMap::new();
        let mut age_sum = 0.0f32;
        for agent in population.agents() {
            age_sum += agent.current_age();
            for stat in agent.stats() {
                let value = stat.value();
                let (sum, summary) = sums.entry(stat.stat_type()).or_insert_with(|| {
                    (
                        0.0,
                        StatSummary {
                            min: value,
                            max: value,
                            ..Default::default()
                        },
                    )
                });
                *sum += value;
                summary.min = summary.min.min(value);
                summary.max = summary.max.max(value);
                if stat.is_bad() {
                    summary.bad_count += 1;
                }
            }
        }

        let stats = sums
            .into_iter()
            .map(|(stat, (sum, mut summary))| {
                summary.average = sum / alive as f32;
                (stat, summary)
            })
            .collect();

        Self {
            alive,
            average_age: age_sum / alive as f32,
            stats,
        }
    }
}

/// Overall run statistics
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub seed: u64,
    pub elapsed: f32,
    pub steps: u64,
    pub spawned: usize,
    pub total_events: usize,
    pub events_by_kind: BTreeMap<String, usize>,
    pub environment_cycles: u64,
    pub final_temperature: f32,
    pub final_environment: f32,
    pub deaths: Vec<DeathRecord>,
    pub population: PopulationStats,
}

/// Accumulates statistics during a run
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    pub total_events: usize,
    pub events_by_kind: BTreeMap<String, usize>,
    pub environment_cycles: u64,
    pub deaths: Vec<DeathRecord>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, event: &VitalsEvent) {
        self.total_events += 1;
        *self.events_by_kind.entry(event_kind(event).to_string()).or_insert(0) += 1;
    }

    pub fn record_cycle(&mut self) {
        self.environment_cycles += 1;
    }

    pub fn record_death(&mut self, death: DeathRecord) {
        self.deaths.push(death);
    }
}

fn event_kind(event: &VitalsEvent) -> &'static str {
    match event {
        VitalsEvent::StatChanged { .. } => "stat_changed",
        VitalsEvent::DeathConditionMet { .. } => "death_condition_met",
        VitalsEvent::GlobalTemperatureChanged { .. } => "global_temperature_changed",
        VitalsEvent::GlobalEnvironmentChanged { .. } => "global_environment_changed",
    }
}

/// Write statistics to a JSON file, creating parent directories.
pub fn write_stats(stats: &SimulationStats, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let json = serde_json::to_string_pretty(stats)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::definition::StatDefinitions;
    use crate::components::entity_stats::EntityStats;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn agent(name: &str, food: f32) -> EntityStats {
        let mut stats = EntityStats::with_definitions(
            AgentId::new(name),
            StatDefinitions::defaults(),
            SmallRng::seed_from_u64(1),
        );
        stats.set_stat(StatType::Food, food);
        stats.drain_events();
        stats
    }

    #[test]
    fn test_empty_population() {
        let stats = PopulationStats::collect(&Population::new());
        assert_eq!(stats.alive, 0);
        assert!(stats.stats.is_empty());
    }

    #[test]
    fn test_population_stats() {
        let mut population = Population::new();
        population.insert(agent("a", 80.0), 0);
        population.insert(agent("b", 20.0), 0);

        let stats = PopulationStats::collect(&population);
        assert_eq!(stats.alive, 2);
        let food = &stats.stats[&StatType::Food];
        assert_eq!(food.average, 50.0);
        assert_eq!(food.min, 20.0);
        assert_eq!(food.max, 80.0);
        assert_eq!(food.bad_count, 1);
    }

    #[test]
    fn test_collector_counts_by_kind() {
        let mut collector = StatsCollector::new();
        collector.record_event(&VitalsEvent::GlobalTemperatureChanged { value: 1.0 });
        collector.record_event(&VitalsEvent::GlobalTemperatureChanged { value: 2.0 });
        collector.record_event(&VitalsEvent::StatChanged {
            stat: StatType::Food,
            value: 3.0,
        });
        assert_eq!(collector.total_events, 3);
        assert_eq!(collector.events_by_kind["global_temperature_changed"], 2);
        assert_eq!(collector.events_by_kind["stat_changed"], 1);
    }

    #[test]
    fn test_death_record_serializes_cause() {
        let death = DeathRecord {
            agent: AgentId::new("a"),
            time: 3.0,
            age: 3.0,
            cause: DeathCause::BadStats {
                stats: vec![StatType::Food, StatType::Water],
            },
        };
        let json = serde_json::to_value(&death).unwrap();
        assert_eq!(json["cause"], "bad_stats");
        assert_eq!(json["stats"][1], "water");
    }
}
