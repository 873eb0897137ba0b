//! Domain models - core simulation types
//!
//! - `CustomerId` / `BarberId` - identities passed between tasks
//! - `Rating` - post-service score
//! - `Outcome` - terminal result of a customer visit

pub mod types;

pub use types::{ArrivalOutcome, BarberId, CustomerId, Outcome, Rating};
