//! Finite-batch day cycle
//!
//! Each day the door issues customers 1..=B. The day closes once all B have
//! reached a terminal outcome (served, left the queue, left seeing everyone
//! asleep, or turned away). Closing takes the counters, clears the ratings and
//! hands a `DayReport` to the reporter.

use crate::io::reporting::{DayReport, DayReporter};
use crate::services::arrivals::ArrivalProcess;
use crate::services::simulation::Simulation;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

pub struct DayCycle {
    sim: Arc<Simulation>,
    reporter: Arc<dyn DayReporter>,
}

impl DayCycle {
    pub fn new(sim: Arc<Simulation>, reporter: Arc<dyn DayReporter>) -> Self {
        Self { sim, reporter }
    }

    /// Run days until the configured count (0 = forever) or shutdown
    ///
    /// Returns the number of days that closed. A day interrupted by shutdown
    /// is not reported.
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> u64 {
        let batch_size = self.sim.config().batch_size();
        let days = self.sim.config().days();
        let mut day = 0u64;

        info!(batch_size = %batch_size, days = %days, "day_cycle_started");

        while days == 0 || day < days {
            let issued = ArrivalProcess::batch(self.sim.clone(), batch_size).run(shutdown.clone()).await;
            if issued < batch_size {
                break;
            }
            if !self.wait_for_close(batch_size, shutdown.clone()).await {
                break;
            }

            day += 1;
            self.close_day(day, batch_size);
        }

        info!(days = %day, "day_cycle_finished");
        day
    }

    /// Wait until every issued customer is accounted for; false on shutdown
    async fn wait_for_close(&self, batch_size: u64, mut shutdown: watch::Receiver<bool>) -> bool {
        debug!(total = %self.sim.stats().total(), batch_size = %batch_size, "day_pending");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return false;
                    }
                }
                total = self.sim.stats().wait_for_total(batch_size) => {
                    debug!(total = %total, "day_accounted_for");
                    return true;
                }
            }
        }
    }

    fn close_day(&self, day: u64, batch_size: u64) {
        let stats = self.sim.stats().take();
        let ratings = self.sim.ratings().reset();

        let report = DayReport {
            run_id: self.sim.run_id().to_string(),
            day,
            batch_size,
            stats,
            ratings,
            closed_at: Utc::now(),
        };
        self.reporter.report(&report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomerId;
    use std::time::Duration;
    use crate::infra::config::Config;
    use crate::infra::rng::{FixedRng, RandomSource, SeededRng};
    use crate::io::reporting::create_day_report_channel;

    fn fast_config() -> Config {
        Config::default()
            .with_capacity(4)
            .with_barbers(2)
            .with_arrival_interval_ms(200)
            .with_cut_ms(300, 500)
            .with_sleep_ms(500, 1000)
            .with_idle_backoff_ms(50)
            .with_reneging(100, 30)
    }

    #[tokio::test(start_paused = true)]
    async fn test_days_close_with_full_batch() {
        let config = fast_config().with_day_cycle(12, 3);
        let sim = Arc::new(Simulation::new(config, Arc::new(SeededRng::new(42)), None));
        let (reporter, mut reports) = create_day_report_channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut staff = sim.spawn_staff(&shutdown_rx);
        let days = DayCycle::new(sim.clone(), Arc::new(reporter)).run(shutdown_rx).await;

        shutdown_tx.send(true).unwrap();
        while let Some(res) = staff.join_next().await {
            res.unwrap();
        }

        assert_eq!(days, 3);
        for expected_day in 1..=3 {
            let report = reports.recv().await.unwrap();
            assert_eq!(report.day, expected_day);
            assert_eq!(report.batch_size, 12);
            assert_eq!(report.stats.total(), 12);
            assert!(report.ratings as u64 <= report.stats.served);
            assert_eq!(report.run_id, sim.run_id());
        }
        assert!(sim.room().is_empty());
        assert_eq!(sim.stats().total(), 0);
        assert!(sim.ratings().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_turned_away_still_closes() {
        // Single chair already taken and nobody serving
        let config = fast_config().with_capacity(1).with_day_cycle(3, 1);
        let rng: Arc<dyn RandomSource> = Arc::new(FixedRng(u64::MAX));
        let sim = Arc::new(Simulation::new(config, rng, None));
        sim.room().try_seat(CustomerId(999));
        let (reporter, mut reports) = create_day_report_channel(2);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let days = DayCycle::new(sim.clone(), Arc::new(reporter)).run(shutdown_rx).await;

        assert_eq!(days, 1);
        let report = reports.recv().await.unwrap();
        assert_eq!(report.stats.rejected_room_full, 3);
        assert_eq!(report.stats.total(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_day_closes_on_last_outcome_without_waiting() {
        // No staff running; the test plays the barber
        let config = fast_config().with_capacity(10).with_day_cycle(2, 1);
        let sim = Arc::new(Simulation::new(config, Arc::new(FixedRng(u64::MAX)), None));
        let (reporter, mut reports) = create_day_report_channel(2);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let cycle = tokio::spawn(DayCycle::new(sim.clone(), Arc::new(reporter)).run(shutdown_rx));
        while sim.room().len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let before = tokio::time::Instant::now();
        while sim.room().try_take_next().is_some() {
            sim.stats().record_served();
        }

        assert_eq!(cycle.await.unwrap(), 1);
        // Paused clock: any timer-driven re-check would have advanced time
        assert_eq!(before.elapsed(), Duration::ZERO);
        assert_eq!(reports.recv().await.unwrap().stats.served, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_mid_day_is_not_reported() {
        // No staff running, so the seated customers never finish
        let config = fast_config().with_capacity(10).with_day_cycle(5, 0);
        let sim = Arc::new(Simulation::new(config, Arc::new(FixedRng(u64::MAX)), None));
        let (reporter, mut reports) = create_day_report_channel(2);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let cycle = tokio::spawn(DayCycle::new(sim.clone(), Arc::new(reporter)).run(shutdown_rx));
        tokio::time::sleep(Duration::from_secs(5)).await;
        shutdown_tx.send(true).unwrap();

        assert_eq!(cycle.await.unwrap(), 0);
        assert!(reports.try_recv().is_err());
        assert_eq!(sim.room().len(), 5);
    }
}
