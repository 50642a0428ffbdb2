//! Stress driver for the shared ring log: spawns reader and writer worker
//! threads against one [`rwlog::RwLog`], measures writer wait and reader
//! session times, and optionally dumps the final log to CSV.

pub mod config;
pub mod export;
pub mod stats;
pub mod worker;

pub use config::StressConfig;
pub use stats::{StressStats, StressSummary};
