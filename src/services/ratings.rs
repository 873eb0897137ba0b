//! Customer ratings
//!
//! With the day cycle on, a served customer leaves at most one rating per day.
//! Re-presenting the same id (the day cycle re-issues ids 1..=B every day) is a
//! no-op until the ledger is reset at day close.
//!
//! In continuous mode ids never repeat and nothing resets the ledger, so only
//! a running count and sum are kept.

use crate::domain::{CustomerId, Rating};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
struct LedgerState {
    /// Only populated in record-once mode
    by_customer: FxHashMap<CustomerId, Rating>,
    count: usize,
    sum: u64,
}

#[derive(Debug)]
pub struct RatingLedger {
    state: Mutex<LedgerState>,
    record_once: bool,
}

impl RatingLedger {
    /// Ledger that refuses a second rating for the same id until reset
    pub fn daily() -> Self {
        Self { state: Mutex::new(LedgerState::default()), record_once: true }
    }

    /// Ledger that only tallies count and sum
    pub fn running() -> Self {
        Self { state: Mutex::new(LedgerState::default()), record_once: false }
    }

    /// Record a rating for `customer`
    ///
    /// Returns false, leaving the stored rating untouched, if the ledger is
    /// record-once and the customer was already rated since the last reset.
    pub fn rate(&self, customer: CustomerId, rating: Rating) -> bool {
        let mut state = self.state.lock();
        if self.record_once {
            if state.by_customer.contains_key(&customer) {
                return false;
            }
            state.by_customer.insert(customer, rating);
        }
        state.count += 1;
        state.sum += u64::from(rating.score());
        true
    }

    /// Stored rating for `customer`; always None for a running ledger
    pub fn rating(&self, customer: CustomerId) -> Option<Rating> {
        self.state.lock().by_customer.get(&customer).copied()
    }

    /// Ratings recorded since the last reset
    pub fn len(&self) -> usize {
        self.state.lock().count
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().count == 0
    }

    /// Mean score since the last reset
    pub fn average(&self) -> Option<f64> {
        let state = self.state.lock();
        (state.count > 0).then(|| state.sum as f64 / state.count as f64)
    }

    /// Forget every rating, returning how many were recorded
    pub fn reset(&self) -> usize {
        let mut state = self.state.lock();
        let count = state.count;
        *state = LedgerState::default();
        count
    }
}
