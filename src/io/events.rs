//! Typed channel for simulation events
//!
//! The core publishes what happens in the shop (arrivals, seating, service,
//! barbers dozing off) without knowing who listens. Sending never blocks:
//! when the channel is full the event is dropped and counted.

use crate::domain::{BarberId, CustomerId, Rating};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Events emitted by the simulation core
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ShopEvent {
    CustomerArrived { customer: CustomerId },
    /// Took a chair; `waiting` includes this customer
    CustomerSeated { customer: CustomerId, waiting: usize, capacity: usize },
    CustomerLeftSeeingAllAsleep { customer: CustomerId },
    CustomerTurnedAway { customer: CustomerId },
    /// Gave up while waiting for a barber
    CustomerLeftQueue { customer: CustomerId },
    BarberSleeping { barber: BarberId, duration_ms: u64 },
    BarberWoke { barber: BarberId, slept_ms: u64 },
    ServiceStarted { barber: BarberId, customer: CustomerId },
    ServiceCompleted { barber: BarberId, customer: CustomerId, rating: Option<Rating> },
}

impl ShopEvent {
    pub fn barber_sleeping(barber: BarberId, duration: Duration) -> Self {
        ShopEvent::BarberSleeping { barber, duration_ms: duration.as_millis() as u64 }
    }

    pub fn barber_woke(barber: BarberId, slept: Duration) -> Self {
        ShopEvent::BarberWoke { barber, slept_ms: slept.as_millis() as u64 }
    }

    /// Short event name used as the log message
    pub fn name(&self) -> &'static str {
        match self {
            ShopEvent::CustomerArrived { .. } => "customer_arrived",
            ShopEvent::CustomerSeated { .. } => "customer_seated",
            ShopEvent::CustomerLeftSeeingAllAsleep { .. } => "customer_left_all_asleep",
            ShopEvent::CustomerTurnedAway { .. } => "customer_turned_away",
            ShopEvent::CustomerLeftQueue { .. } => "customer_left_queue",
            ShopEvent::BarberSleeping { .. } => "barber_sleeping",
            ShopEvent::BarberWoke { .. } => "barber_woke",
            ShopEvent::ServiceStarted { .. } => "service_started",
            ShopEvent::ServiceCompleted { .. } => "service_completed",
        }
    }
}

/// Sender handle for shop events
///
/// Clone this to share across multiple producers.
/// Non-blocking - if the channel is full, events are dropped.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::Sender<ShopEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSender {
    /// Create a new sender from an mpsc sender
    pub fn new(tx: mpsc::Sender<ShopEvent>) -> Self {
        Self { tx, dropped: Arc::new(AtomicU64::new(0)) }
    }

    /// Publish an event, dropping it if the channel is full or closed
    pub fn send(&self, event: ShopEvent) {
        if self.tx.try_send(event).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Events dropped so far across all clones of this sender
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Create a new event channel pair
///
/// Returns (sender, receiver) where sender can be cloned and shared.
/// Buffer size determines how many events can be queued.
pub fn create_event_channel(buffer_size: usize) -> (EventSender, mpsc::Receiver<ShopEvent>) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_and_receive() {
        let (sender, mut rx) = create_event_channel(4);

        sender.send(ShopEvent::CustomerArrived { customer: CustomerId(1) });

        assert_eq!(rx.recv().await, Some(ShopEvent::CustomerArrived { customer: CustomerId(1) }));
        assert_eq!(sender.dropped(), 0);
    }

    #[tokio::test]
    async fn test_full_channel_drops_without_blocking() {
        let (sender, _rx) = create_event_channel(1);
        let clone = sender.clone();

        sender.send(ShopEvent::CustomerTurnedAway { customer: CustomerId(1) });
        clone.send(ShopEvent::CustomerTurnedAway { customer: CustomerId(2) });
        clone.send(ShopEvent::CustomerTurnedAway { customer: CustomerId(3) });

        // Drop counter is shared between clones
        assert_eq!(sender.dropped(), 2);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = ShopEvent::CustomerSeated { customer: CustomerId(7), waiting: 2, capacity: 4 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"t":"customer_seated","customer":7,"waiting":2,"capacity":4}"#);
    }
}
