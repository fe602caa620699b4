//! Change notifications and the event bus that distributes them.
//!
//! Every mutation of the item store and every enrichment transition emits a
//! [`DigestEvent`]. Renderers subscribe and re-derive their view state when
//! an event arrives; they never poll.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::ItemId;

// ============================================================================
// Digest Event
// ============================================================================

/// Board-level change notification.
///
/// Serialized as JSON with a `type` tag field, e.g.:
/// `{"type":"EnrichmentStarted","item_id":"18c2f"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DigestEvent {
    /// The item collection was replaced wholesale.
    ItemsLoaded {
        item_count: usize,
        fallback: bool,
        revision: u64,
    },
    /// An enrichment attempt was admitted.
    EnrichmentStarted { item_id: ItemId },
    /// A summary was written into the store.
    ItemEnriched { item_id: ItemId, revision: u64 },
    /// An enrichment attempt failed; the item is re-triggerable.
    EnrichmentFailed { item_id: ItemId, error: String },
    /// An admitted attempt ended without touching the store: the item left
    /// the store mid-flight, or the attempt was withdrawn before it ran.
    EnrichmentDiscarded { item_id: ItemId },
}

impl DigestEvent {
    /// Namespaced event type (e.g., `"item.enriched"`).
    pub fn event_type(&self) -> &'static str {
        match self {
            DigestEvent::ItemsLoaded { .. } => "items.loaded",
            DigestEvent::EnrichmentStarted { .. } => "enrichment.started",
            DigestEvent::ItemEnriched { .. } => "item.enriched",
            DigestEvent::EnrichmentFailed { .. } => "enrichment.failed",
            DigestEvent::EnrichmentDiscarded { .. } => "enrichment.discarded",
        }
    }

    /// The item this event relates to, if any.
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            DigestEvent::ItemsLoaded { .. } => None,
            DigestEvent::EnrichmentStarted { item_id }
            | DigestEvent::ItemEnriched { item_id, .. }
            | DigestEvent::EnrichmentFailed { item_id, .. }
            | DigestEvent::EnrichmentDiscarded { item_id } => Some(item_id),
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast-based event bus for board change notifications.
///
/// Uses `tokio::sync::broadcast`. Slow receivers that fall behind get a
/// `Lagged` error and should re-read the full board state.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DigestEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Emit an event to all subscribers. Dropped silently when nobody listens.
    pub fn emit(&self, event: DigestEvent) {
        tracing::debug!(
            event_type = event.event_type(),
            subscriber_count = self.tx.receiver_count(),
            "EventBus emit"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribe to receive events. Each subscriber gets its own stream.
    pub fn subscribe(&self) -> broadcast::Receiver<DigestEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();

        bus.emit(DigestEvent::EnrichmentStarted {
            item_id: ItemId::from(1),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type(), "enrichment.started");
        assert_eq!(event.item_id(), Some(&ItemId::from(1)));
    }

    #[tokio::test]
    async fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(DigestEvent::ItemsLoaded {
            item_count: 5,
            fallback: true,
            revision: 1,
        });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            DigestEvent::ItemsLoaded { item_count: 5, .. }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            DigestEvent::ItemsLoaded { fallback: true, .. }
        ));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default();
        bus.emit(DigestEvent::EnrichmentDiscarded {
            item_id: ItemId::from("gone"),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_serialization_tag() {
        let json = serde_json::to_value(DigestEvent::ItemEnriched {
            item_id: ItemId::from("abc"),
            revision: 3,
        })
        .unwrap();
        assert_eq!(json["type"], "ItemEnriched");
        assert_eq!(json["item_id"], "abc");
        assert_eq!(json["revision"], 3);
    }
}
