use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// A domain event queued for delivery to the broker.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEvent {
    pub topic: String,
    pub payload: serde_json::Value,
    pub published_at: DateTime<Utc>,
}

/// Producer half of the event pipeline.
///
/// Cloned into every service that emits events. Publishing enqueues onto an
/// unbounded channel consumed by [`super::EventRelay`]; a full/closed channel
/// is logged, never surfaced to the caller.
#[derive(Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl EventPublisher {
    /// Create a publisher together with the receiver end for the relay.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue an event for delivery. Infallible from the caller's view.
    pub fn publish<T: Serialize>(&self, topic: &str, payload: &T) {
        let payload = match serde_json::to_value(payload) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(topic, "Failed to serialize event payload: {}", e);
                return;
            }
        };

        let event = OutboundEvent {
            topic: topic.to_string(),
            payload,
            published_at: Utc::now(),
        };

        if self.tx.send(event).is_err() {
            tracing::warn!(topic, "Event relay is gone, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_enqueues_event() {
        let (publisher, mut rx) = EventPublisher::channel();

        publisher.publish("wallet.created", &json!({"wallet_id": "w-1"}));

        let event = rx.try_recv().expect("event should be queued");
        assert_eq!(event.topic, "wallet.created");
        assert_eq!(event.payload["wallet_id"], "w-1");
    }

    #[test]
    fn test_publish_after_relay_dropped_does_not_panic() {
        let (publisher, rx) = EventPublisher::channel();
        drop(rx);

        // Must be a silent no-op
        publisher.publish("user.kyc.verification_started", &json!({"user_id": "u-1"}));
    }

    #[test]
    fn test_events_drain_in_publish_order() {
        let (publisher, mut rx) = EventPublisher::channel();

        publisher.publish("a", &json!({"n": 1}));
        publisher.publish("b", &json!({"n": 2}));

        assert_eq!(rx.try_recv().unwrap().topic, "a");
        assert_eq!(rx.try_recv().unwrap().topic, "b");
    }
}
