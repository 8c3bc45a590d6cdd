//! Stat Components
//!
//! Definitions, live stat values, and an agent's full stat set.

pub mod definition;
pub mod entity_stats;
pub mod stat;

pub use definition::*;
pub use entity_stats::*;
pub use stat::*;
