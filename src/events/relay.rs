use tokio::sync::mpsc;

use super::publisher::OutboundEvent;
use crate::config::EventsConfig;

/// Consumes queued events and ships them to the broker endpoint.
///
/// Runs in its own tokio task for the lifetime of the process. There is no
/// retry, no buffering beyond the channel, and no delivery guarantee: a
/// non-2xx response or transport error is logged and the event is dropped.
pub struct EventRelay {
    rx: mpsc::UnboundedReceiver<OutboundEvent>,
    client: reqwest::Client,
    config: EventsConfig,
}

impl EventRelay {
    pub fn new(rx: mpsc::UnboundedReceiver<OutboundEvent>, config: EventsConfig) -> Self {
        Self {
            rx,
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Drain the channel until every publisher handle is dropped.
    pub async fn run(mut self) {
        tracing::info!(
            enabled = self.config.enabled,
            endpoint = %self.config.endpoint,
            "Event relay started"
        );

        while let Some(event) = self.rx.recv().await {
            self.deliver(event).await;
        }

        tracing::info!("Event relay stopped");
    }

    async fn deliver(&self, event: OutboundEvent) {
        if !self.config.enabled {
            tracing::debug!(topic = %event.topic, "Event relay disabled, dropping event");
            return;
        }

        match self
            .client
            .post(&self.config.endpoint)
            .json(&event)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                tracing::debug!(topic = %event.topic, "Event delivered");
            }
            Ok(resp) => {
                tracing::warn!(
                    topic = %event.topic,
                    status = %resp.status(),
                    "Broker rejected event"
                );
            }
            Err(e) => {
                tracing::warn!(topic = %event.topic, "Failed to deliver event: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventPublisher;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use serde_json::json;

    #[tokio::test]
    async fn test_relay_posts_events_to_broker() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/events")
                    .json_body_partial(r#"{"topic": "wallet.created"}"#);
                then.status(200);
            })
            .await;

        let (publisher, rx) = EventPublisher::channel();
        publisher.publish("wallet.created", &json!({"wallet_id": "w-1"}));
        drop(publisher);

        let relay = EventRelay::new(
            rx,
            EventsConfig {
                enabled: true,
                endpoint: server.url("/events"),
            },
        );
        relay.run().await;

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_relay_drops_events_when_disabled() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/events");
                then.status(200);
            })
            .await;

        let (publisher, rx) = EventPublisher::channel();
        publisher.publish("user.kyc.verification_started", &json!({"user_id": "u-1"}));
        drop(publisher);

        let relay = EventRelay::new(
            rx,
            EventsConfig {
                enabled: false,
                endpoint: server.url("/events"),
            },
        );
        relay.run().await;

        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_relay_survives_broker_errors() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/events");
                then.status(500);
            })
            .await;

        let (publisher, rx) = EventPublisher::channel();
        publisher.publish("wallet.created", &json!({"wallet_id": "w-1"}));
        publisher.publish("wallet.created", &json!({"wallet_id": "w-2"}));
        drop(publisher);

        let relay = EventRelay::new(
            rx,
            EventsConfig {
                enabled: true,
                endpoint: server.url("/events"),
            },
        );
        // Must drain both events despite 500s
        relay.run().await;

        assert_eq!(mock.hits_async().await, 2);
    }
}
