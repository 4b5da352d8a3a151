//! Topic-based event bus backing subscription fields.

use std::sync::Arc;

use async_stream::stream;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::resolvers::EventStream;

/// Default number of events buffered in the broadcast channel.
pub const EVENT_BUFFER_SIZE: usize = 1024;

/// A payload published on a topic.
#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub topic: Arc<str>,
    /// Wrapped in Arc to avoid deep clones per receiver.
    pub payload: Arc<Value>,
}

/// Broadcaster for published events.
///
/// Cheap to clone; every clone publishes into the same channel. Subscribers
/// only see events published after they subscribed.
#[derive(Clone)]
pub struct PubSub {
    sender: broadcast::Sender<PublishedEvent>,
}

impl PubSub {
    /// Creates a bus buffering up to `capacity` events per slow receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `payload` on `topic`.
    ///
    /// Returns the number of subscribers that received the event.
    /// Returns 0 if there are no active subscribers.
    pub fn publish(&self, topic: &str, payload: Value) -> usize {
        let event = PublishedEvent {
            topic: Arc::from(topic),
            payload: Arc::new(payload),
        };
        match self.sender.send(event) {
            Ok(count) => {
                trace!(topic, receivers = count, "Published event");
                count
            }
            Err(_) => 0, // No active receivers
        }
    }

    /// Streams the payloads published on `topic` from now on.
    ///
    /// The receiver is registered immediately, not on first poll.
    #[must_use]
    pub fn subscribe(&self, topic: &str) -> EventStream {
        let mut receiver = self.sender.subscribe();
        let topic: Arc<str> = Arc::from(topic);
        debug!(topic = %topic, "Subscribed to topic");

        Box::pin(stream! {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if event.topic != topic {
                            continue;
                        }
                        yield Ok::<_, async_graphql::Error>(Value::clone(&event.payload));
                    }
                    Err(broadcast::error::RecvError::Lagged(count)) => {
                        warn!(
                            topic = %topic,
                            count,
                            "Subscription lagged, some events were dropped"
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!(topic = %topic, "Subscription channel closed");
                        break;
                    }
                }
            }
        })
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for PubSub {
    fn default() -> Self {
        Self::new(EVENT_BUFFER_SIZE)
    }
}

impl std::fmt::Debug for PubSub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PubSub")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_subscribe() {
        let pubsub = PubSub::default();
        let mut messages = pubsub.subscribe("messageSent");
        assert_eq!(pubsub.subscriber_count(), 1);

        pubsub.publish("other", json!({"ignored": true}));
        pubsub.publish("messageSent", json!({"text": "hi"}));

        let received = messages.next().await.unwrap().unwrap();
        assert_eq!(received, json!({"text": "hi"}));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let pubsub = PubSub::new(8);
        assert_eq!(pubsub.publish("topic", json!(1)), 0);
    }

    #[tokio::test]
    async fn test_clones_share_channel() {
        let pubsub = PubSub::new(8);
        let publisher = pubsub.clone();
        let mut stream = pubsub.subscribe("t");

        assert_eq!(publisher.publish("t", json!(7)), 1);
        assert_eq!(stream.next().await.unwrap().unwrap(), json!(7));
    }
}
