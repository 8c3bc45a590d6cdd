//! Event Types
//!
//! Notifications raised by the vitals engine, and the record format used
//! when they are written to an event log.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stat::StatType;

/// Unique identifier for an agent
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the sequential id used for spawned agents, e.g. `agent_0007`.
    pub fn numbered(index: usize) -> Self {
        Self(format!("agent_{:04}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A notification emitted by the engine.
///
/// Agent-level events (`StatChanged`, `DeathConditionMet`) come from an
/// agent's stat set; global events come from the environment coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VitalsEvent {
    /// A stat was written; carries the clamped value after the write.
    StatChanged { stat: StatType, value: f32 },
    /// The number of Bad stats met the death threshold.
    ///
    /// Level-triggered: raised on every evaluation while the condition
    /// holds, not only on the transition into it.
    DeathConditionMet { bad_stats: Vec<StatType> },
    /// Ambient temperature after a coordinator cycle.
    GlobalTemperatureChanged { value: f32 },
    /// Ambient environment quality after a coordinator cycle.
    GlobalEnvironmentChanged { value: f32 },
}

impl VitalsEvent {
    /// Returns true for events that concern a single agent.
    pub fn is_agent_event(&self) -> bool {
        matches!(
            self,
            VitalsEvent::StatChanged { .. } | VitalsEvent::DeathConditionMet { .. }
        )
    }

    pub fn is_death_condition(&self) -> bool {
        matches!(self, VitalsEvent::DeathConditionMet { .. })
    }

    /// Returns the stat an event refers to, if it refers to exactly one.
    pub fn stat(&self) -> Option<StatType> {
        match self {
            VitalsEvent::StatChanged { stat, .. } => Some(*stat),
            _ => None,
        }
    }
}

/// One line of an event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Sequential id, e.g. `evt_00000042`
    pub event_id: String,
    /// Simulation time in seconds when the event was recorded
    pub time: f32,
    /// Agent the event belongs to; `None` for global events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentId>,
    pub event: VitalsEvent,
}

impl EventRecord {
    pub fn new(
        event_id: impl Into<String>,
        time: f32,
        agent: Option<AgentId>,
        event: VitalsEvent,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            time,
            agent,
            event,
        }
    }

    /// Serializes the record to a JSON line (for JSONL format).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Generates an event ID with the given sequence number.
pub fn generate_event_id(sequence: u64) -> String {
    format!("evt_{:08}", sequence)
}
