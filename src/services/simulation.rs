//! Shared simulation context
//!
//! One `Simulation` owns every resource the tasks contend over and is handed
//! to each task behind an `Arc`. Nothing lives in process-wide statics.

use crate::domain::{ArrivalOutcome, CustomerId};
use crate::infra::config::Config;
use crate::infra::rng::{RandomSource, SeededRng};
use crate::infra::stats::StatsRegistry;
use crate::io::events::{EventSender, ShopEvent};
use crate::io::reporting::StatsReporter;
use crate::services::arrivals;
use crate::services::barber::{BarberPool, BarberWorker};
use crate::services::ratings::RatingLedger;
use crate::services::reneging::RenegingWatcher;
use crate::services::waiting_room::WaitingRoom;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use tracing::info;
use uuid::Uuid;

pub struct Simulation {
    /// Identifies this run in day reports (UUIDv7)
    run_id: String,
    config: Config,
    room: WaitingRoom,
    stats: Arc<StatsRegistry>,
    pool: BarberPool,
    /// The single cutting chair; held for the whole duration of a haircut
    chair: Mutex<()>,
    rng: Arc<dyn RandomSource>,
    ratings: RatingLedger,
    events: Option<EventSender>,
}

impl Simulation {
    pub fn new(config: Config, rng: Arc<dyn RandomSource>, events: Option<EventSender>) -> Self {
        // Ids repeat only under the day cycle
        let ratings = if config.day_cycle_enabled() {
            RatingLedger::daily()
        } else {
            RatingLedger::running()
        };
        Self {
            run_id: Uuid::now_v7().to_string(),
            room: WaitingRoom::new(config.capacity()),
            stats: Arc::new(StatsRegistry::new()),
            pool: BarberPool::new(config.barbers()),
            chair: Mutex::new(()),
            rng,
            ratings,
            events,
            config,
        }
    }

    /// Build a simulation whose randomness comes from the configured seed
    pub fn from_config(config: Config, events: Option<EventSender>) -> Self {
        let rng: Arc<dyn RandomSource> = Arc::new(SeededRng::new(config.seed()));
        Self::new(config, rng, events)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn room(&self) -> &WaitingRoom {
        &self.room
    }

    pub fn stats(&self) -> &Arc<StatsRegistry> {
        &self.stats
    }

    pub fn pool(&self) -> &BarberPool {
        &self.pool
    }

    pub fn chair(&self) -> &Mutex<()> {
        &self.chair
    }

    pub fn rng(&self) -> &dyn RandomSource {
        self.rng.as_ref()
    }

    pub fn ratings(&self) -> &RatingLedger {
        &self.ratings
    }

    /// Publish an event if anyone is listening
    pub fn emit(&self, event: ShopEvent) {
        if let Some(ref sender) = self.events {
            sender.send(event);
        }
    }

    /// Let one customer through the door
    pub fn admit(&self, customer: CustomerId) -> ArrivalOutcome {
        arrivals::admit(self, customer)
    }

    /// Spawn one worker per barber, the reneging watcher and the stats reporter
    ///
    /// Every task stops when `shutdown` flips to true.
    pub fn spawn_staff(self: &Arc<Self>, shutdown: &watch::Receiver<bool>) -> JoinSet<()> {
        let mut tasks = JoinSet::new();

        for barber in self.pool.barbers() {
            let worker = BarberWorker::new(self.clone(), barber.clone());
            tasks.spawn(worker.run(shutdown.clone()));
        }

        tasks.spawn(RenegingWatcher::new(self.clone()).run(shutdown.clone()));

        let reporter = StatsReporter::new(
            self.stats.clone(),
            Duration::from_millis(self.config.stats_interval_ms()),
        );
        tasks.spawn(reporter.run(shutdown.clone()));

        info!(
            run_id = %self.run_id,
            barbers = %self.pool.len(),
            capacity = %self.room.capacity(),
            "staff_started"
        );
        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BarberId, Rating};
    use crate::infra::rng::FixedRng;
    use crate::io::events::create_event_channel;

    #[test]
    fn test_new_builds_resources_from_config() {
        let config = Config::default().with_capacity(3).with_barbers(4);
        let sim = Simulation::new(config, Arc::new(FixedRng(0)), None);

        assert_eq!(sim.room().capacity(), 3);
        assert_eq!(sim.pool().len(), 4);
        let ids: Vec<BarberId> = sim.pool().barbers().iter().map(|b| b.id()).collect();
        assert_eq!(ids, vec![BarberId(1), BarberId(2), BarberId(3), BarberId(4)]);
        assert_eq!(sim.stats().total(), 0);
        assert!(!sim.run_id().is_empty());
    }

    #[test]
    fn test_ledger_mode_follows_day_cycle() {
        let score = Rating::saturating(3);

        // Continuous ids never repeat, so repeats are simply tallied
        let continuous = Simulation::new(Config::default(), Arc::new(FixedRng(0)), None);
        assert!(continuous.ratings().rate(CustomerId(1), score));
        assert!(continuous.ratings().rate(CustomerId(1), score));
        assert_eq!(continuous.ratings().len(), 2);

        let daily = Simulation::new(Config::default().with_day_cycle(3, 1), Arc::new(FixedRng(0)), None);
        assert!(daily.ratings().rate(CustomerId(1), score));
        assert!(!daily.ratings().rate(CustomerId(1), score));
        assert_eq!(daily.ratings().len(), 1);
    }

    #[tokio::test]
    async fn test_emit_forwards_to_sender() {
        let (sender, mut rx) = create_event_channel(4);
        let sim = Simulation::from_config(Config::default().with_seed(1), Some(sender));

        sim.emit(ShopEvent::CustomerArrived { customer: CustomerId(3) });

        assert_eq!(rx.recv().await, Some(ShopEvent::CustomerArrived { customer: CustomerId(3) }));
    }

    #[test]
    fn test_emit_without_listener_is_noop() {
        let sim = Simulation::from_config(Config::default(), None);
        sim.emit(ShopEvent::CustomerArrived { customer: CustomerId(3) });
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_staff_stops_on_shutdown() {
        let sim = Arc::new(Simulation::new(
            Config::default().with_barbers(3),
            Arc::new(SeededRng::new(11)),
            None,
        ));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut tasks = sim.spawn_staff(&shutdown_rx);
        // 3 barbers + watcher + reporter
        assert_eq!(tasks.len(), 5);

        tokio::time::sleep(Duration::from_secs(30)).await;
        shutdown_tx.send(true).unwrap();

        while let Some(res) = tasks.join_next().await {
            res.unwrap();
        }
    }
}
