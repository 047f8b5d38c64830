//! Cross-instance notification broadcast.
//!
//! # Responsibility
//! - Fan notification mutations out to every attached center.
//!
//! # Invariants
//! - Envelopes carry their origin so a center can skip its own echoes.
//! - Receivers never block: `poll` reports `Empty` instead of waiting.
//! - A lagging receiver is told how many envelopes it lost; the caller must
//!   resynchronize from the durable store.

use crate::model::notification::{NotificationId, NotificationRecord};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

/// Identity of one running center.
pub type InstanceId = Uuid;

const DEFAULT_CAPACITY: usize = 64;

/// A mutation applied by some center.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    Added(NotificationRecord),
    MarkedRead(NotificationId),
    MarkedAllRead,
    Dismissed(NotificationId),
    Cleared,
}

impl NotificationEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Added(_) => "added",
            Self::MarkedRead(_) => "marked_read",
            Self::MarkedAllRead => "marked_all_read",
            Self::Dismissed(_) => "dismissed",
            Self::Cleared => "cleared",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusEnvelope {
    pub origin: InstanceId,
    pub event: NotificationEvent,
}

/// Sending half; cheap to clone.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<BusEnvelope>,
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationBus {
    /// Creates a bus retaining at most `capacity` undelivered envelopes per
    /// receiver.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes to every subscriber; returns how many received it.
    pub fn publish(&self, envelope: BusEnvelope) -> usize {
        self.tx.send(envelope).unwrap_or(0)
    }

    pub fn subscribe(&self) -> BusSubscription {
        BusSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Result of one non-blocking receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusPoll {
    Message(BusEnvelope),
    Empty,
    /// Envelopes were dropped before this receiver read them.
    Lagged(u64),
    Closed,
}

#[derive(Debug)]
pub struct BusSubscription {
    rx: broadcast::Receiver<BusEnvelope>,
}

impl BusSubscription {
    pub fn poll(&mut self) -> BusPoll {
        match self.rx.try_recv() {
            Ok(envelope) => BusPoll::Message(envelope),
            Err(TryRecvError::Empty) => BusPoll::Empty,
            Err(TryRecvError::Lagged(skipped)) => BusPoll::Lagged(skipped),
            Err(TryRecvError::Closed) => BusPoll::Closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BusEnvelope, BusPoll, NotificationBus, NotificationEvent};
    use uuid::Uuid;

    fn envelope(event: NotificationEvent) -> BusEnvelope {
        BusEnvelope {
            origin: Uuid::new_v4(),
            event,
        }
    }

    #[test]
    fn delivers_to_every_subscriber() {
        let bus = NotificationBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(envelope(NotificationEvent::Cleared)), 2);
        assert!(matches!(first.poll(), BusPoll::Message(_)));
        assert!(matches!(second.poll(), BusPoll::Message(_)));
        assert_eq!(first.poll(), BusPoll::Empty);
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = NotificationBus::default();
        assert_eq!(bus.publish(envelope(NotificationEvent::MarkedAllRead)), 0);
    }

    #[test]
    fn reports_lag_and_close() {
        let bus = NotificationBus::new(1);
        let mut rx = bus.subscribe();
        bus.publish(envelope(NotificationEvent::Cleared));
        bus.publish(envelope(NotificationEvent::MarkedAllRead));
        assert_eq!(rx.poll(), BusPoll::Lagged(1));
        assert!(matches!(rx.poll(), BusPoll::Message(_)));

        drop(bus);
        assert_eq!(rx.poll(), BusPoll::Closed);
    }
}
