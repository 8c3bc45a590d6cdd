//! Event logging for engine notifications.

pub mod logger;

pub use logger::EventLogger;
