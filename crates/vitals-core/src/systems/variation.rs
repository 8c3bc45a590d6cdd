//! Variation Timers
//!
//! Elapsed-time accumulators gating each stat's variation cycle. Every
//! source keeps its own clock, so one stat reaching its interval never
//! resets another.

use std::collections::BTreeMap;

use vitals_events::StatType;

/// Per-stat elapsed seconds since the stat's last variation cycle.
#[derive(Debug, Clone, Default)]
pub struct VariationTracker {
    elapsed: BTreeMap<StatType, f32>,
}

impl VariationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta_time` to a source's clock and returns the new total.
    pub fn advance(&mut self, stat: StatType, delta_time: f32) -> f32 {
        let elapsed = self.elapsed.entry(stat).or_insert(0.0);
        *elapsed += delta_time;
        *elapsed
    }

    /// Check if a source has reached its interval
    pub fn is_due(&self, stat: StatType, interval: f32) -> bool {
        interval > 0.0 && self.elapsed(stat) >= interval
    }

    /// Mark that a cycle fired; only this source's clock restarts.
    pub fn mark_applied(&mut self, stat: StatType) {
        self.elapsed.insert(stat, 0.0);
    }

    pub fn elapsed(&self, stat: StatType) -> f32 {
        self.elapsed.get(&stat).copied().unwrap_or(0.0)
    }

    /// Zero every clock
    pub fn reset(&mut self) {
        self.elapsed.clear();
    }
}
