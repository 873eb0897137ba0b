//! Bounded waiting room shared by arrivals, barbers and the reneging watcher
//!
//! Every operation takes the seat lock once, so a check and the mutation that
//! depends on it are never split across two calls. Order of removal is not
//! FIFO-guaranteed: barbers claim the head, the reneging watcher may take any
//! occupant.

use crate::domain::CustomerId;
use crate::infra::rng::RandomSource;
use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

pub struct WaitingRoom {
    seats: Mutex<VecDeque<CustomerId>>,
    capacity: usize,
    /// Signalled whenever a customer sits down
    occupied: Notify,
}

impl WaitingRoom {
    pub fn new(capacity: usize) -> Self {
        Self {
            seats: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            occupied: Notify::new(),
        }
    }

    /// Seat a customer if a chair is free
    ///
    /// Returns false when the room is full. Concurrent callers can never
    /// both take the last chair.
    pub fn try_seat(&self, customer: CustomerId) -> bool {
        {
            let mut seats = self.seats.lock();
            if seats.len() >= self.capacity {
                return false;
            }
            seats.push_back(customer);
        }
        self.occupied.notify_one();
        true
    }

    /// Claim the customer at the head of the room without waiting
    pub fn try_take_next(&self) -> Option<CustomerId> {
        self.seats.lock().pop_front()
    }

    /// Claim the next customer, waiting until one sits down
    ///
    /// Cancel-safe: a customer is only removed in the same poll that returns it.
    pub async fn take_next(&self) -> CustomerId {
        loop {
            let notified = self.occupied.notified();
            if let Some(customer) = self.try_take_next() {
                return customer;
            }
            notified.await;
        }
    }

    /// Remove one occupant chosen uniformly at random
    ///
    /// Returns None on an empty room. The remaining occupants keep their
    /// relative order.
    pub fn remove_random(&self, rng: &dyn RandomSource) -> Option<CustomerId> {
        let mut seats = self.seats.lock();
        if seats.is_empty() {
            return None;
        }
        let index = rng.index(seats.len());
        seats.remove(index)
    }

    /// Current occupancy; may be stale as soon as it returns
    pub fn len(&self) -> usize {
        self.seats.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, customer: CustomerId) -> bool {
        self.seats.lock().contains(&customer)
    }

    /// Copy of the current occupants, head first
    pub fn occupants(&self) -> Vec<CustomerId> {
        self.seats.lock().iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::rng::{FixedRng, SeededRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn filled(capacity: usize, ids: &[u64]) -> WaitingRoom {
        let room = WaitingRoom::new(capacity);
        for &id in ids {
            assert!(room.try_seat(CustomerId(id)));
        }
        room
    }

    #[test]
    fn test_seat_until_full() {
        let room = WaitingRoom::new(4);

        for id in 1..=4 {
            assert!(room.try_seat(CustomerId(id)));
        }
        assert!(!room.try_seat(CustomerId(5)));

        assert_eq!(room.len(), 4);
        assert_eq!(room.occupants(), vec![CustomerId(1), CustomerId(2), CustomerId(3), CustomerId(4)]);
        assert!(!room.contains(CustomerId(5)));
    }

    #[test]
    fn test_concurrent_seating_never_overfills() {
        let room = Arc::new(filled(4, &[100]));
        let seated = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        // 16 threads race for the 3 remaining chairs
        for id in 0..16u64 {
            let room = room.clone();
            let seated = seated.clone();
            handles.push(thread::spawn(move || {
                if room.try_seat(CustomerId(id)) {
                    seated.fetch_add(1, Ordering::Relaxed);
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(seated.load(Ordering::Relaxed), 3);
        assert_eq!(room.len(), 4);
    }

    #[test]
    fn test_concurrent_seat_and_take() {
        let room = Arc::new(WaitingRoom::new(2));
        let mut handles = vec![];

        for t in 0..4u64 {
            let room = room.clone();
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    room.try_seat(CustomerId(t * 1000 + i));
                    assert!(room.len() <= 2);
                    room.try_take_next();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        assert!(room.len() <= 2);
    }

    #[test]
    fn test_take_next_is_head() {
        let room = filled(4, &[1, 2, 3]);

        assert_eq!(room.try_take_next(), Some(CustomerId(1)));
        assert_eq!(room.try_take_next(), Some(CustomerId(2)));
        assert_eq!(room.len(), 1);
    }

    #[test]
    fn test_remove_random_shrinks_by_one() {
        let rng = SeededRng::new(3);
        let room = filled(4, &[1, 2, 3, 4]);

        let removed = room.remove_random(&rng).unwrap();

        assert_eq!(room.len(), 3);
        assert!(!room.contains(removed));
        // Everyone else is still there
        for id in (1..=4).map(CustomerId).filter(|&id| id != removed) {
            assert!(room.contains(id));
        }
    }

    #[test]
    fn test_remove_random_can_take_interior() {
        let room = filled(4, &[1, 2, 3]);

        assert_eq!(room.remove_random(&FixedRng(1)), Some(CustomerId(2)));
        assert_eq!(room.occupants(), vec![CustomerId(1), CustomerId(3)]);
    }

    #[test]
    fn test_remove_random_empty_room() {
        let room = WaitingRoom::new(1);

        assert_eq!(room.remove_random(&FixedRng(0)), None);
        assert!(room.is_empty());
    }

    #[tokio::test]
    async fn test_take_next_waits_for_customer() {
        let room = Arc::new(WaitingRoom::new(4));

        let waiter = {
            let room = room.clone();
            tokio::spawn(async move { room.take_next().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        room.try_seat(CustomerId(9));
        assert_eq!(waiter.await.unwrap(), CustomerId(9));
        assert!(room.is_empty());
    }

    #[tokio::test]
    async fn test_take_next_returns_waiting_customer_immediately() {
        let room = filled(2, &[5]);
        assert_eq!(room.take_next().await, CustomerId(5));
    }
}
