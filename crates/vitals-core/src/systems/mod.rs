//! Systems
//!
//! Time-driven processes acting on agents' stats: variation timers, the
//! environment coordinator, and the crowding lookup feeding space.

pub mod environment;
pub mod proximity;
pub mod variation;

// Re-export commonly used systems
pub use environment::{
    convergence_delta, stress_delta, AgentDirectory, CycleReport, EnvironmentCoordinator,
};
pub use proximity::AgentsByLocation;
pub use variation::VariationTracker;
