//! Configuration file loading

use std::fs;

use vitals_core::config::{default_config_toml, VitalsConfig};
use vitals_core::{ConfigError, Simulation, StatType};
use vitals_core::events::EventLogger;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vitals.toml");
    fs::write(
        &path,
        r#"
[stats]
bad_stats_for_death = 3

[environment]
convergence_rate = 0.25

[simulation]
agents = 4
"#,
    )
    .unwrap();

    let config = VitalsConfig::from_file(&path).unwrap();
    assert_eq!(config.stats.bad_stats_for_death, 3);
    assert_eq!(config.environment.convergence_rate, 0.25);
    assert_eq!(config.simulation.agents, 4);
    assert_eq!(config.simulation.seed, 42);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = VitalsConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[stats\nbad_stats_for_death = ").unwrap();
    let err = VitalsConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn test_written_default_config_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vitals.toml");
    fs::write(&path, default_config_toml()).unwrap();

    let config = VitalsConfig::from_file(&path).unwrap();
    let text = config.to_toml().unwrap();
    let reparsed = VitalsConfig::from_str(&text).unwrap();
    assert_eq!(reparsed.environment, config.environment);
    assert_eq!(reparsed.stats.max_lifespan, config.stats.max_lifespan);
}

#[test]
fn test_custom_definitions_drive_simulation() {
    let config = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "health"
baseline_min = 50.0
baseline_max = 100.0
absolute_min = 0.0
absolute_max = 100.0

[[stats.definitions]]
stat = "temperature"
baseline_min = 40.0
baseline_max = 60.0
absolute_min = 0.0
absolute_max = 100.0
affected_by_external = true

[simulation]
agents = 3
duration = 5.0
"#,
    )
    .unwrap();

    let mut sim = Simulation::new(config, EventLogger::null()).unwrap();
    assert_eq!(sim.definitions().len(), 2);
    assert_eq!(sim.population().len(), 3);
    for agent in sim.population().agents() {
        assert_eq!(agent.stats().count(), 2);
    }

    sim.run().unwrap();
    // Health never moves and is one of only two stats, so nobody can die.
    assert_eq!(sim.population().len(), 3);
    for agent in sim.population().agents() {
        assert!(agent.get_stat(StatType::Food).is_none());
        assert!(agent.get_stat(StatType::Temperature).is_some());
    }
}

#[test]
fn test_invalid_band_names_stat() {
    let err = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "water"
baseline_min = 90.0
baseline_max = 10.0
absolute_min = 0.0
absolute_max = 100.0
"#,
    )
    .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("water"), "{message}");
    assert!(message.contains("baseline"), "{message}");
}

#[test]
fn test_infinite_bounds_rejected() {
    let err = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "health"
baseline_min = -inf
baseline_max = 100.0
absolute_min = 0.0
absolute_max = 100.0
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)), "{err}");

    let err = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "health"
baseline_min = 50.0
baseline_max = 100.0
absolute_min = 0.0
absolute_max = inf
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("absolute"), "{err}");
}

#[test]
fn test_nan_variation_amount_rejected() {
    let err = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "food"
baseline_min = 50.0
baseline_max = 100.0
absolute_min = 0.0
absolute_max = 100.0
variation_amount = nan
variation_interval = 10.0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("variation_amount"), "{err}");
}

#[test]
fn test_baseline_outside_absolute_rejected() {
    let err = VitalsConfig::from_str(
        r#"
[[stats.definitions]]
stat = "space"
baseline_min = 150.0
baseline_max = 200.0
absolute_min = 0.0
absolute_max = 100.0
"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("outside absolute"), "{err}");
}
