//! Stat Definitions
//!
//! Immutable per-stat-type rules: the baseline band that counts as Good,
//! the absolute band every value is clamped to, and the passive variation
//! cycle.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use vitals_events::{StatState, StatType};

use crate::error::{Band, ConfigError, Result};

/// Static rules for one stat type.
///
/// Construct through [`StatDefinition::new`] (or deserialize), both of which
/// reject inverted bands. Shared behind an `Arc` by every [`Stat`] bound to it.
///
/// [`Stat`]: super::stat::Stat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStatDefinition", into = "RawStatDefinition")]
pub struct StatDefinition {
    stat_type: StatType,
    baseline_min: f32,
    baseline_max: f32,
    absolute_min: f32,
    absolute_max: f32,
    variation_amount: f32,
    variation_interval: f32,
    affected_by_external: bool,
}

impl StatDefinition {
    /// Creates a definition with no passive variation.
    ///
    /// Both bands must be finite and ordered, and the baseline band must lie
    /// inside the absolute band.
    pub fn new(stat_type: StatType, baseline: (f32, f32), absolute: (f32, f32)) -> Result<Self> {
        check_band(stat_type, Band::Baseline, baseline)?;
        check_band(stat_type, Band::Absolute, absolute)?;
        if baseline.0 < absolute.0 || baseline.1 > absolute.1 {
            return Err(ConfigError::BaselineOutsideAbsolute {
                stat: stat_type,
                baseline,
                absolute,
            });
        }

        Ok(Self {
            stat_type,
            baseline_min: baseline.0,
            baseline_max: baseline.1,
            absolute_min: absolute.0,
            absolute_max: absolute.1,
            variation_amount: 0.0,
            variation_interval: 0.0,
            affected_by_external: false,
        })
    }

    /// Sets the passive variation cycle. An interval of zero disables it.
    pub fn with_variation(mut self, amount: f32, interval: f32) -> Result<Self> {
        if !interval.is_finite() || interval < 0.0 {
            return Err(ConfigError::InvalidInterval {
                what: format!("{} variation", self.stat_type),
                value: interval,
            });
        }
        if !amount.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "variation_amount",
                value: amount,
            });
        }
        self.variation_amount = amount;
        self.variation_interval = interval;
        Ok(self)
    }

    pub fn with_external(mut self, affected_by_external: bool) -> Self {
        self.affected_by_external = affected_by_external;
        self
    }

    pub fn stat_type(&self) -> StatType {
        self.stat_type
    }

    pub fn baseline_min(&self) -> f32 {
        self.baseline_min
    }

    pub fn baseline_max(&self) -> f32 {
        self.baseline_max
    }

    pub fn absolute_min(&self) -> f32 {
        self.absolute_min
    }

    pub fn absolute_max(&self) -> f32 {
        self.absolute_max
    }

    pub fn variation_amount(&self) -> f32 {
        self.variation_amount
    }

    pub fn variation_interval(&self) -> f32 {
        self.variation_interval
    }

    /// Advisory only; writes are never gated on it.
    pub fn affected_by_external(&self) -> bool {
        self.affected_by_external
    }

    /// Good iff the value lies in the closed baseline band.
    pub fn get_state(&self, value: f32) -> StatState {
        if self.baseline_min <= value && value <= self.baseline_max {
            StatState::Good
        } else {
            StatState::Bad
        }
    }

    pub fn clamp_value(&self, value: f32) -> f32 {
        value.clamp(self.absolute_min, self.absolute_max)
    }

    /// Uniform sample from the baseline band, so fresh stats start Good.
    pub fn random_start_value<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let value = rng.gen_range(self.baseline_min..=self.baseline_max);
        self.clamp_value(value)
    }

    /// True when a timer should drive this stat's passive change.
    pub fn has_variation_cycle(&self) -> bool {
        self.variation_interval > 0.0
    }

    /// Built-in rules for a stat type.
    pub fn default_for(stat_type: StatType) -> Self {
        let (variation_amount, variation_interval, affected_by_external) = match stat_type {
            StatType::Health => (0.0, 0.0, false),
            StatType::Food => (-1.0, 10.0, false),
            StatType::Water => (-1.0, 5.0, false),
            StatType::Stress => (0.0, 0.0, true),
            StatType::Environment => (0.0, 0.0, true),
            StatType::Temperature => (0.0, 0.0, true),
            // Interval gates recompute_space; the change itself is computed there.
            StatType::Space => (0.0, 20.0, false),
        };

        Self {
            stat_type,
            baseline_min: 50.0,
            baseline_max: 100.0,
            absolute_min: 0.0,
            absolute_max: 100.0,
            variation_amount,
            variation_interval,
            affected_by_external,
        }
    }
}

fn check_band(stat: StatType, band: Band, (min, max): (f32, f32)) -> Result<()> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { stat, band, min, max })
    }
}

/// Serialized form of a [`StatDefinition`], as written in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawStatDefinition {
    stat: StatType,
    baseline_min: f32,
    baseline_max: f32,
    absolute_min: f32,
    absolute_max: f32,
    #[serde(default)]
    variation_amount: f32,
    #[serde(default)]
    variation_interval: f32,
    #[serde(default)]
    affected_by_external: bool,
}

impl TryFrom<RawStatDefinition> for StatDefinition {
    type Error = ConfigError;

    fn try_from(raw: RawStatDefinition) -> Result<Self> {
        Ok(StatDefinition::new(
            raw.stat,
            (raw.baseline_min, raw.baseline_max),
            (raw.absolute_min, raw.absolute_max),
        )?
        .with_variation(raw.variation_amount, raw.variation_interval)?
        .with_external(raw.affected_by_external))
    }
}

impl From<StatDefinition> for RawStatDefinition {
    fn from(def: StatDefinition) -> Self {
        Self {
            stat: def.stat_type,
            baseline_min: def.baseline_min,
            baseline_max: def.baseline_max,
            absolute_min: def.absolute_min,
            absolute_max: def.absolute_max,
            variation_amount: def.variation_amount,
            variation_interval: def.variation_interval,
            affected_by_external: def.affected_by_external,
        }
    }
}

/// A configuration set: at most one shared definition per stat type.
#[derive(Debug, Clone, PartialEq)]
pub struct StatDefinitions {
    definitions: Vec<Arc<StatDefinition>>,
}

impl Default for StatDefinitions {
    fn default() -> Self {
        Self::defaults()
    }
}

impl StatDefinitions {
    /// The built-in table covering every stat type.
    pub fn defaults() -> Self {
        Self {
            definitions: StatType::all()
                .iter()
                .map(|&stat| Arc::new(StatDefinition::default_for(stat)))
                .collect(),
        }
    }

    /// Builds a set from explicit definitions. An empty input yields the
    /// defaults; a repeated stat type is rejected.
    pub fn from_definitions(definitions: impl IntoIterator<Item = StatDefinition>) -> Result<Self> {
        let mut collected: Vec<Arc<StatDefinition>> = Vec::new();
        for def in definitions {
            if collected.iter().any(|d| d.stat_type() == def.stat_type()) {
                return Err(ConfigError::DuplicateStat(def.stat_type()));
            }
            collected.push(Arc::new(def));
        }

        if collected.is_empty() {
            return Ok(Self::defaults());
        }
        Ok(Self {
            definitions: collected,
        })
    }

    pub fn get(&self, stat: StatType) -> Option<&Arc<StatDefinition>> {
        self.definitions.iter().find(|d| d.stat_type() == stat)
    }

    pub fn contains(&self, stat: StatType) -> bool {
        self.get(stat).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<StatDefinition>> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_table() {
        let defs = StatDefinitions::defaults();
        assert_eq!(defs.len(), 7);

        for def in defs.iter() {
            assert_eq!(def.baseline_min(), 50.0);
            assert_eq!(def.baseline_max(), 100.0);
            assert_eq!(def.absolute_min(), 0.0);
            assert_eq!(def.absolute_max(), 100.0);
        }

        let food = defs.get(StatType::Food).unwrap();
        assert_eq!(food.variation_amount(), -1.0);
        assert_eq!(food.variation_interval(), 10.0);
        assert!(!food.affected_by_external());

        let water = defs.get(StatType::Water).unwrap();
        assert_eq!(water.variation_amount(), -1.0);
        assert_eq!(water.variation_interval(), 5.0);

        let space = defs.get(StatType::Space).unwrap();
        assert_eq!(space.variation_amount(), 0.0);
        assert_eq!(space.variation_interval(), 20.0);

        for stat in [StatType::Stress, StatType::Environment, StatType::Temperature] {
            let def = defs.get(stat).unwrap();
            assert!(def.affected_by_external());
            assert!(!def.has_variation_cycle());
        }
        assert!(!defs.get(StatType::Health).unwrap().has_variation_cycle());
    }

    #[test]
    fn test_get_state_is_boundary_inclusive() {
        let def = StatDefinition::default_for(StatType::Health);
        assert_eq!(def.get_state(50.0), StatState::Good);
        assert_eq!(def.get_state(100.0), StatState::Good);
        assert_eq!(def.get_state(75.0), StatState::Good);
        assert_eq!(def.get_state(49.999), StatState::Bad);
        assert_eq!(def.get_state(0.0), StatState::Bad);
        assert_eq!(def.get_state(100.001), StatState::Bad);
    }

    #[test]
    fn test_clamp_value() {
        let def = StatDefinition::default_for(StatType::Water);
        assert_eq!(def.clamp_value(-5.0), 0.0);
        assert_eq!(def.clamp_value(150.0), 100.0);
        assert_eq!(def.clamp_value(42.0), 42.0);
    }

    #[test]
    fn test_random_start_value_in_baseline() {
        let def = StatDefinition::new(StatType::Stress, (20.0, 30.0), (0.0, 100.0)).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..200 {
            let value = def.random_start_value(&mut rng);
            assert!((20.0..=30.0).contains(&value));
        }
    }

    #[test]
    fn test_random_start_value_degenerate_band() {
        let def = StatDefinition::new(StatType::Health, (80.0, 80.0), (0.0, 100.0)).unwrap();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(def.random_start_value(&mut rng), 80.0);
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let err = StatDefinition::new(StatType::Food, (100.0, 50.0), (0.0, 100.0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange { stat: StatType::Food, band: Band::Baseline, .. }
        ));

        let err = StatDefinition::new(StatType::Food, (50.0, 100.0), (100.0, 0.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { band: Band::Absolute, .. }));

        assert!(StatDefinition::new(StatType::Food, (f32::NAN, 100.0), (0.0, 100.0)).is_err());
    }

    #[test]
    fn test_infinite_bounds_rejected() {
        let err = StatDefinition::new(StatType::Health, (f32::NEG_INFINITY, 100.0), (0.0, 100.0)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange { stat: StatType::Health, band: Band::Baseline, .. }
        ));

        let err = StatDefinition::new(StatType::Health, (50.0, 100.0), (0.0, f32::INFINITY)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { band: Band::Absolute, .. }));
    }

    #[test]
    fn test_baseline_outside_absolute_rejected() {
        let err = StatDefinition::new(StatType::Food, (150.0, 200.0), (0.0, 100.0)).unwrap_err();
        assert!(matches!(err, ConfigError::BaselineOutsideAbsolute { stat: StatType::Food, .. }));
        assert!(StatDefinition::new(StatType::Food, (-10.0, 50.0), (0.0, 100.0)).is_err());
        assert!(StatDefinition::new(StatType::Food, (0.0, 100.0), (0.0, 100.0)).is_ok());
    }

    #[test]
    fn test_non_finite_variation_amount_rejected() {
        for amount in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let result = StatDefinition::default_for(StatType::Food).with_variation(amount, 10.0);
            assert!(matches!(
                result,
                Err(ConfigError::InvalidParameter { name: "variation_amount", .. })
            ));
        }
    }

    #[test]
    fn test_negative_interval_rejected() {
        let result = StatDefinition::new(StatType::Food, (50.0, 100.0), (0.0, 100.0))
            .unwrap()
            .with_variation(-1.0, -3.0);
        assert!(matches!(result, Err(ConfigError::InvalidInterval { .. })));
    }

    #[test]
    fn test_full_span_baseline_never_bad() {
        let def = StatDefinition::new(StatType::Environment, (0.0, 100.0), (0.0, 100.0)).unwrap();
        for raw in [-50.0, 0.0, 33.3, 100.0, 250.0] {
            assert_eq!(def.get_state(def.clamp_value(raw)), StatState::Good);
        }
    }

    #[test]
    fn test_duplicate_definitions_rejected() {
        let result = StatDefinitions::from_definitions(vec![
            StatDefinition::default_for(StatType::Food),
            StatDefinition::default_for(StatType::Food),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateStat(StatType::Food))));
    }

    #[test]
    fn test_empty_definitions_fall_back_to_defaults() {
        let defs = StatDefinitions::from_definitions(Vec::new()).unwrap();
        assert_eq!(defs, StatDefinitions::defaults());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok = r#"
            stat = "food"
            baseline_min = 40.0
            baseline_max = 90.0
            absolute_min = 0.0
            absolute_max = 100.0
            variation_amount = -2.0
            variation_interval = 3.0
        "#;
        let def: StatDefinition = toml::from_str(ok).unwrap();
        assert_eq!(def.stat_type(), StatType::Food);
        assert_eq!(def.variation_amount(), -2.0);
        assert!(!def.affected_by_external());

        let bad = r#"
            stat = "food"
            baseline_min = 90.0
            baseline_max = 40.0
            absolute_min = 0.0
            absolute_max = 100.0
        "#;
        assert!(toml::from_str::<StatDefinition>(bad).is_err());
    }
}
