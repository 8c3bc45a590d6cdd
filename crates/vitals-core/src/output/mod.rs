//! Run output: statistics and summaries.

pub mod stats;

pub use stats::*;
