//! Runtime stat value bound to a shared definition.

use std::sync::Arc;

use rand::Rng;
use vitals_events::{StatState, StatType};

use super::definition::StatDefinition;

/// One live value. Always within the definition's absolute band.
#[derive(Debug, Clone)]
pub struct Stat {
    definition: Arc<StatDefinition>,
    current_value: f32,
}

impl Stat {
    /// Creates a stat with a supplied starting value (clamped). NaN starts
    /// at the bottom of the baseline band.
    pub fn new(definition: Arc<StatDefinition>, value: f32) -> Self {
        let value = if value.is_nan() { definition.baseline_min() } else { value };
        let current_value = definition.clamp_value(value);
        Self {
            definition,
            current_value,
        }
    }

    /// Creates a stat starting at a random point of its baseline band.
    pub fn with_random_value<R: Rng + ?Sized>(definition: Arc<StatDefinition>, rng: &mut R) -> Self {
        let current_value = definition.random_start_value(rng);
        Self {
            definition,
            current_value,
        }
    }

    pub fn stat_type(&self) -> StatType {
        self.definition.stat_type()
    }

    pub fn definition(&self) -> &StatDefinition {
        &self.definition
    }

    pub fn value(&self) -> f32 {
        self.current_value
    }

    pub fn state(&self) -> StatState {
        self.definition.get_state(self.current_value)
    }

    pub fn is_bad(&self) -> bool {
        self.state().is_bad()
    }

    /// Bounded add. Returns the new value. A non-finite delta is ignored.
    pub fn add(&mut self, delta: f32) -> f32 {
        if delta.is_finite() {
            self.current_value = self.definition.clamp_value(self.current_value + delta);
        }
        self.current_value
    }

    /// Bounded set against the absolute band; the baseline is ignored.
    /// A non-finite value is ignored.
    pub fn set(&mut self, value: f32) -> f32 {
        if value.is_finite() {
            self.current_value = self.definition.clamp_value(value);
        }
        self.current_value
    }
}
