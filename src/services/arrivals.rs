//! Customer arrivals
//!
//! `admit` is the door: one customer either walks out, is turned away, or
//! takes a seat. `ArrivalProcess` drives the door at a fixed cadence, either
//! forever or for a finite batch.

use crate::domain::{ArrivalOutcome, CustomerId, Outcome};
use crate::io::events::ShopEvent;
use crate::services::simulation::Simulation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Let one customer in
///
/// If every barber is asleep the customer may leave on the spot. Otherwise
/// they try to sit; a full room turns them away. Both early exits are counted
/// here. A seated customer's outcome is counted later by a barber or the
/// reneging watcher.
pub fn admit(sim: &Simulation, customer: CustomerId) -> ArrivalOutcome {
    sim.emit(ShopEvent::CustomerArrived { customer });

    if sim.pool().all_asleep() && sim.rng().percent(sim.config().all_asleep_leave_pct()) {
        sim.stats().record(Outcome::LeftSeeingAllAsleep);
        sim.emit(ShopEvent::CustomerLeftSeeingAllAsleep { customer });
        return ArrivalOutcome::Left(Outcome::LeftSeeingAllAsleep);
    }

    if sim.room().try_seat(customer) {
        sim.emit(ShopEvent::CustomerSeated {
            customer,
            waiting: sim.room().len(),
            capacity: sim.room().capacity(),
        });
        ArrivalOutcome::Seated
    } else {
        sim.stats().record(Outcome::TurnedAway);
        sim.emit(ShopEvent::CustomerTurnedAway { customer });
        ArrivalOutcome::Left(Outcome::TurnedAway)
    }
}

/// Issues customer ids 1, 2, 3, ... one per arrival interval
pub struct ArrivalProcess {
    sim: Arc<Simulation>,
    /// None = until shutdown
    limit: Option<u64>,
}

impl ArrivalProcess {
    /// Arrivals continue until shutdown
    pub fn continuous(sim: Arc<Simulation>) -> Self {
        Self { sim, limit: None }
    }

    /// Exactly `size` arrivals, ids 1..=size
    pub fn batch(sim: Arc<Simulation>, size: u64) -> Self {
        Self { sim, limit: Some(size) }
    }

    /// Run the door; returns the number of customers issued
    ///
    /// Each arrival waits one interval first, so the first customer shows up
    /// one interval after start.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        let interval = Duration::from_millis(self.sim.config().arrival_interval_ms());
        let mut issued = 0u64;

        while self.limit.map_or(true, |limit| issued < limit) {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                _ = tokio::time::sleep(interval) => {}
            }

            issued += 1;
            let customer = CustomerId(issued);
            let outcome = self.sim.admit(customer);
            debug!(customer = %customer, outcome = %outcome.as_str(), "customer_admitted");
        }

        info!(issued = %issued, "arrivals_finished");
        issued
    }
}
