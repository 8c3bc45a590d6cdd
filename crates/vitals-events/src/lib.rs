//! Shared event types and serialization for the agent vitals engine.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for all other crates in the workspace.

pub mod event;
pub mod stat;

// Re-export stat identity types
pub use stat::{ParseStatTypeError, StatState, StatType};

// Re-export event types
pub use event::{generate_event_id, AgentId, EventRecord, VitalsEvent};
