//! Services - shop behavior and shared state
//!
//! This module contains the core simulation services:
//! - `simulation` - Shared context owning every contended resource
//! - `waiting_room` - Bounded, atomically-guarded waiting room
//! - `barber` - Barber sleep status, pool view and worker loop
//! - `reneging` - Periodic random walk-outs from the waiting room
//! - `arrivals` - The door and the arrival cadence
//! - `ratings` - Record-once customer ratings
//! - `day_cycle` - Finite-batch days with per-day reporting

pub mod arrivals;
pub mod barber;
pub mod day_cycle;
pub mod ratings;
pub mod reneging;
pub mod simulation;
pub mod waiting_room;

// Re-export commonly used types
pub use arrivals::{admit, ArrivalProcess};
pub use barber::{Barber, BarberPool, BarberStep, BarberWorker};
pub use day_cycle::DayCycle;
pub use ratings::RatingLedger;
pub use reneging::RenegingWatcher;
pub use simulation::Simulation;
pub use waiting_room::WaitingRoom;
