//! Impatient customers walking out of the waiting room

use crate::domain::CustomerId;
use crate::io::events::ShopEvent;
use crate::services::simulation::Simulation;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Once per tick, with probability 1/N, one random waiting customer gives up
pub struct RenegingWatcher {
    sim: Arc<Simulation>,
}

impl RenegingWatcher {
    pub fn new(sim: Arc<Simulation>) -> Self {
        Self { sim }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let tick = Duration::from_millis(self.sim.config().renege_tick_ms());
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            tick_ms = %tick.as_millis(),
            one_in = %self.sim.config().renege_one_in(),
            "reneging_watcher_started"
        );

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.tick();
                }
            }
        }

        debug!("reneging_watcher_stopped");
    }

    /// One roll of the dice; returns the customer who left, if any
    ///
    /// An empty room is skipped without rolling.
    pub fn tick(&self) -> Option<CustomerId> {
        if self.sim.room().is_empty() {
            return None;
        }
        if !self.sim.rng().one_in(self.sim.config().renege_one_in()) {
            return None;
        }

        // The room may have emptied since the check; removal re-checks under the lock
        let customer = self.sim.room().remove_random(self.sim.rng())?;
        self.sim.stats().record_reneged_from_queue();
        self.sim.emit(ShopEvent::CustomerLeftQueue { customer });
        Some(customer)
    }
}
