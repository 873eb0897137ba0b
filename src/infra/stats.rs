//! Lock-free outcome counters
//!
//! Four independent counters, one per terminal customer outcome. Increments
//! are a single `fetch_add`; the day-cycle reset is a per-counter atomic swap
//! that hands back the pre-reset values, so an increment racing a reset either
//! lands in the returned snapshot or after it. Nothing is lost.
//!
//! NOTE: All atomics use Relaxed ordering intentionally. The counters carry no
//! cross-field invariant and are never used to publish other memory.
//!
//! Every increment also wakes `wait_for_total` callers, so the day cycle can
//! block until a batch is accounted for instead of re-reading on a timer.

use crate::domain::Outcome;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use tracing::info;

/// Outcome counters shared by every task
#[derive(Debug, Default)]
pub struct StatsRegistry {
    /// Customers whose haircut completed
    served: AtomicU64,
    /// Customers that left the waiting room before service
    reneged_from_queue: AtomicU64,
    /// Customers that walked out because every barber was asleep
    reneged_seeing_all_asleep: AtomicU64,
    /// Customers turned away by a full waiting room
    rejected_room_full: AtomicU64,
    /// Signalled after every increment
    recorded: Notify,
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_served(&self) {
        self.served.fetch_add(1, Ordering::Relaxed);
        self.recorded.notify_waiters();
    }

    #[inline]
    pub fn record_reneged_from_queue(&self) {
        self.reneged_from_queue.fetch_add(1, Ordering::Relaxed);
        self.recorded.notify_waiters();
    }

    #[inline]
    pub fn record_reneged_seeing_all_asleep(&self) {
        self.reneged_seeing_all_asleep.fetch_add(1, Ordering::Relaxed);
        self.recorded.notify_waiters();
    }

    #[inline]
    pub fn record_rejected_room_full(&self) {
        self.rejected_room_full.fetch_add(1, Ordering::Relaxed);
        self.recorded.notify_waiters();
    }

    /// Count a terminal outcome against its counter
    pub fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Served => self.record_served(),
            Outcome::LeftQueue => self.record_reneged_from_queue(),
            Outcome::LeftSeeingAllAsleep => self.record_reneged_seeing_all_asleep(),
            Outcome::TurnedAway => self.record_rejected_room_full(),
        }
    }

    #[inline]
    pub fn served(&self) -> u64 {
        self.served.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reneged_from_queue(&self) -> u64 {
        self.reneged_from_queue.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reneged_seeing_all_asleep(&self) -> u64 {
        self.reneged_seeing_all_asleep.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_room_full(&self) -> u64 {
        self.rejected_room_full.load(Ordering::Relaxed)
    }

    /// Sum of all four counters, i.e. customers that reached a terminal outcome
    #[inline]
    pub fn total(&self) -> u64 {
        self.snapshot().total()
    }

    /// Wait until the counters sum to at least `at_least`; returns that sum
    ///
    /// Cancel-safe. The waiter is registered before the counters are read, so
    /// an increment landing between the read and the await still wakes it.
    pub async fn wait_for_total(&self, at_least: u64) -> u64 {
        loop {
            let notified = self.recorded.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            let total = self.total();
            if total >= at_least {
                return total;
            }
            notified.await;
        }
    }

    /// Read every counter without resetting
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            served: self.served(),
            reneged_from_queue: self.reneged_from_queue(),
            reneged_seeing_all_asleep: self.reneged_seeing_all_asleep(),
            rejected_room_full: self.rejected_room_full(),
        }
    }

    /// Swap every counter to zero and return the values they held
    ///
    /// This is the only method that resets counters.
    pub fn take(&self) -> StatsSnapshot {
        StatsSnapshot {
            served: self.served.swap(0, Ordering::Relaxed),
            reneged_from_queue: self.reneged_from_queue.swap(0, Ordering::Relaxed),
            reneged_seeing_all_asleep: self.reneged_seeing_all_asleep.swap(0, Ordering::Relaxed),
            rejected_room_full: self.rejected_room_full.swap(0, Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub served: u64,
    pub reneged_from_queue: u64,
    pub reneged_seeing_all_asleep: u64,
    pub rejected_room_full: u64,
}

impl StatsSnapshot {
    #[inline]
    pub fn total(&self) -> u64 {
        self.served + self.reneged_from_queue + self.reneged_seeing_all_asleep + self.rejected_room_full
    }

    pub fn log(&self) {
        info!(
            served = %self.served,
            left_queue = %self.reneged_from_queue,
            left_all_asleep = %self.reneged_seeing_all_asleep,
            turned_away = %self.rejected_room_full,
            "stats"
        );
    }
}
