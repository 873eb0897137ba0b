//! Statistics reporting
//!
//! - `StatsReporter` logs a counter snapshot on a fixed interval
//! - `DayReporter` is the hook the day cycle calls once per closed batch

use crate::infra::stats::{StatsRegistry, StatsSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

/// Periodic snapshot logger
pub struct StatsReporter {
    stats: Arc<StatsRegistry>,
    interval: Duration,
}

impl StatsReporter {
    pub fn new(stats: Arc<StatsRegistry>, interval: Duration) -> Self {
        Self { stats, interval }
    }

    /// Log a snapshot every interval until shutdown
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        // First tick completes immediately; skip it so the first report has data
        interval.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    self.stats.snapshot().log();
                }
            }
        }
    }
}

/// Summary of one closed day
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    /// Identifies the simulation run (UUIDv7)
    pub run_id: String,
    /// Day counter, starting at 1
    pub day: u64,
    /// Customers issued this day
    pub batch_size: u64,
    /// Counters as they stood when the batch closed
    pub stats: StatsSnapshot,
    /// Distinct customers rated this day
    pub ratings: usize,
    pub closed_at: DateTime<Utc>,
}

/// Hook invoked once per closed batch
pub trait DayReporter: Send + Sync {
    fn report(&self, report: &DayReport);
}

/// Reporter that writes the day summary to the log
#[derive(Debug, Default)]
pub struct LogDayReporter;

impl DayReporter for LogDayReporter {
    fn report(&self, report: &DayReport) {
        info!(
            run_id = %report.run_id,
            day = %report.day,
            batch_size = %report.batch_size,
            served = %report.stats.served,
            left_queue = %report.stats.reneged_from_queue,
            left_all_asleep = %report.stats.reneged_seeing_all_asleep,
            turned_away = %report.stats.rejected_room_full,
            ratings = %report.ratings,
            "day_closed"
        );
    }
}

/// Reporter that forwards day summaries to a channel
///
/// Non-blocking - if the channel is full, the report is dropped with a warning.
#[derive(Clone)]
pub struct ChannelDayReporter {
    tx: mpsc::Sender<DayReport>,
}

impl ChannelDayReporter {
    pub fn new(tx: mpsc::Sender<DayReport>) -> Self {
        Self { tx }
    }
}

impl DayReporter for ChannelDayReporter {
    fn report(&self, report: &DayReport) {
        if let Err(e) = self.tx.try_send(report.clone()) {
            warn!(day = %report.day, error = %e, "day_report_dropped");
        }
    }
}

/// Create a channel-backed day reporter
pub fn create_day_report_channel(buffer_size: usize) -> (ChannelDayReporter, mpsc::Receiver<DayReport>) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (ChannelDayReporter::new(tx), rx)
}
