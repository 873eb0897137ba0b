//! Barbers and their worker loop
//!
//! Each barber alternates between three states:
//! - Serving: claimed a waiting customer, holds the cutting chair for the cut
//! - Asleep: no customer was available and the sleep roll came up
//! - Idle: no customer and no nap; waits a short backoff for someone to sit down
//!
//! The asleep flag is a relaxed atomic and is never locked. `BarberPool` reads
//! it to decide whether arrivals see an all-asleep shop; a stale read only
//! nudges that heuristic and is accepted.

use crate::domain::{BarberId, CustomerId, Rating};
use crate::io::events::ShopEvent;
use crate::services::simulation::Simulation;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct Barber {
    id: BarberId,
    asleep: AtomicBool,
}

impl Barber {
    pub fn new(id: BarberId) -> Self {
        Self { id, asleep: AtomicBool::new(false) }
    }

    #[inline]
    pub fn id(&self) -> BarberId {
        self.id
    }

    /// Best-effort read; may be stale by the time the caller acts on it
    #[inline]
    pub fn is_asleep(&self) -> bool {
        self.asleep.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_asleep(&self, asleep: bool) {
        self.asleep.store(asleep, Ordering::Relaxed);
    }
}

/// Read-only view over every barber's sleep status
pub struct BarberPool {
    barbers: Vec<Arc<Barber>>,
}

impl BarberPool {
    /// Create `count` barbers with ids 1..=count
    pub fn new(count: u32) -> Self {
        Self { barbers: (1..=count).map(|id| Arc::new(Barber::new(BarberId(id)))).collect() }
    }

    /// True when every barber is asleep right now (best-effort)
    pub fn all_asleep(&self) -> bool {
        self.barbers.iter().all(|b| b.is_asleep())
    }

    pub fn asleep_count(&self) -> usize {
        self.barbers.iter().filter(|b| b.is_asleep()).count()
    }

    pub fn barbers(&self) -> &[Arc<Barber>] {
        &self.barbers
    }

    pub fn len(&self) -> usize {
        self.barbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barbers.is_empty()
    }
}

/// What one pass of the worker loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarberStep {
    Served(CustomerId),
    Slept(Duration),
    Idled,
}

/// Worker loop driving a single barber
pub struct BarberWorker {
    sim: Arc<Simulation>,
    barber: Arc<Barber>,
}

impl BarberWorker {
    pub fn new(sim: Arc<Simulation>, barber: Arc<Barber>) -> Self {
        Self { sim, barber }
    }

    /// Run the worker until shutdown
    ///
    /// Shutdown may interrupt a haircut in progress; that customer is not counted.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(barber = %self.barber.id(), "barber_started");

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                step = self.step() => {
                    debug!(
                        barber = %self.barber.id(),
                        step = ?step,
                        asleep = %self.sim.pool().asleep_count(),
                        "barber_step"
                    );
                }
            }
        }

        self.barber.set_asleep(false);
        info!(barber = %self.barber.id(), "barber_stopped");
    }

    /// One pass: serve a waiting customer, otherwise nap or idle
    pub async fn step(&self) -> BarberStep {
        if let Some(customer) = self.sim.room().try_take_next() {
            self.serve(customer).await;
            return BarberStep::Served(customer);
        }

        let config = self.sim.config();
        if self.sim.rng().percent(config.sleep_chance_pct()) {
            let duration = self.sim.rng().between_ms(config.sleep_min_ms(), config.sleep_max_ms());
            self.sleep(duration).await;
            return BarberStep::Slept(duration);
        }

        // Wait out the backoff, but take anyone who sits down meanwhile
        let backoff = Duration::from_millis(config.idle_backoff_ms());
        match tokio::time::timeout(backoff, self.sim.room().take_next()).await {
            Ok(customer) => {
                self.serve(customer).await;
                BarberStep::Served(customer)
            }
            Err(_) => BarberStep::Idled,
        }
    }

    /// Cut one customer's hair while holding the chair
    pub async fn serve(&self, customer: CustomerId) {
        // Awake before anything else happens to this customer
        self.barber.set_asleep(false);

        let config = self.sim.config();
        let duration = self.sim.rng().between_ms(config.cut_min_ms(), config.cut_max_ms());
        {
            let _chair = self.sim.chair().lock().await;
            self.sim.emit(ShopEvent::ServiceStarted { barber: self.barber.id(), customer });
            tokio::time::sleep(duration).await;
        }

        // Rate before counting: the day may close the moment `served` moves
        let rating = self.rate(customer);
        self.sim.stats().record_served();
        self.sim.emit(ShopEvent::ServiceCompleted { barber: self.barber.id(), customer, rating });
    }

    /// Record the customer's rating; None if they were already rated today
    fn rate(&self, customer: CustomerId) -> Option<Rating> {
        let rating = self.sim.rng().rating();
        self.sim.ratings().rate(customer, rating).then_some(rating)
    }

    async fn sleep(&self, duration: Duration) {
        self.barber.set_asleep(true);
        self.sim.emit(ShopEvent::barber_sleeping(self.barber.id(), duration));

        tokio::time::sleep(duration).await;

        self.barber.set_asleep(false);
        self.sim.emit(ShopEvent::barber_woke(self.barber.id(), duration));
    }
}
