//! Console narration of shop events
//!
//! Consumes the event channel and writes one structured log line per event.
//! The line format belongs to the tracing subscriber installed by `main`.

use crate::io::events::ShopEvent;
use tokio::sync::{mpsc, watch};
use tracing::info;

/// Narrator actor
pub struct Narrator {
    rx: mpsc::Receiver<ShopEvent>,
    narrated: u64,
}

impl Narrator {
    pub fn new(rx: mpsc::Receiver<ShopEvent>) -> Self {
        Self { rx, narrated: 0 }
    }

    /// Run the narration loop
    ///
    /// Runs until the shutdown signal is received or every sender is gone.
    /// Returns the number of events narrated.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped shutdown sender counts as shutdown
                    if changed.is_err() || *shutdown.borrow() {
                        // Drain remaining events
                        while let Ok(event) = self.rx.try_recv() {
                            self.narrate(&event);
                        }
                        break;
                    }
                }
                event = self.rx.recv() => {
                    match event {
                        Some(event) => self.narrate(&event),
                        None => break, // Channel closed
                    }
                }
            }
        }

        info!(narrated = %self.narrated, "narrator_stopped");
        self.narrated
    }

    fn narrate(&mut self, event: &ShopEvent) {
        self.narrated += 1;
        let name = event.name();
        match event {
            ShopEvent::CustomerArrived { customer }
            | ShopEvent::CustomerLeftSeeingAllAsleep { customer }
            | ShopEvent::CustomerTurnedAway { customer }
            | ShopEvent::CustomerLeftQueue { customer } => {
                info!(customer = %customer, "{}", name);
            }
            ShopEvent::CustomerSeated { customer, waiting, capacity } => {
                info!(customer = %customer, waiting = %waiting, capacity = %capacity, "{}", name);
            }
            ShopEvent::BarberSleeping { barber, duration_ms } => {
                info!(barber = %barber, duration_ms = %duration_ms, "{}", name);
            }
            ShopEvent::BarberWoke { barber, slept_ms } => {
                info!(barber = %barber, slept_ms = %slept_ms, "{}", name);
            }
            ShopEvent::ServiceStarted { barber, customer } => {
                info!(barber = %barber, customer = %customer, "{}", name);
            }
            ShopEvent::ServiceCompleted { barber, customer, rating } => {
                info!(barber = %barber, customer = %customer, rating = ?rating.map(|r| r.score()), "{}", name);
            }
        }
    }
}
