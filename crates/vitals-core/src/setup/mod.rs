//! World Setup
//!
//! Population spawning.

pub mod agents;

pub use agents::*;
