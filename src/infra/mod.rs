//! Infrastructure - configuration, counters, and randomness
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, defaults, validation)
//! - `stats` - Lock-free outcome counters
//! - `rng` - Injected random source

pub mod config;
pub mod rng;
pub mod stats;

// Re-export commonly used types
pub use config::Config;
pub use rng::{FixedRng, RandomSource, SeededRng};
pub use stats::{StatsRegistry, StatsSnapshot};
