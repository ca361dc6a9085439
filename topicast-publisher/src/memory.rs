//! In-process backend.
//!
//! [`MemorySession`] keeps every accepted message in memory. It is meant for
//! local development and tests, where a real pub/sub service is unavailable.
//! The store is unbounded: accepted messages stay until [`MemorySession::clear`].

use crate::backend::{BackendError, BackendSession, PublishClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::{collections::HashSet, sync::Arc, time::Duration};
use topicast_core::{DeliveryId, Envelope, PublishContext, TopicId};
use tracing::trace;
use uuid::Uuid;

/// A message the in-memory backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedMessage {
    /// Id returned to the publisher
    pub delivery_id: DeliveryId,
    /// Destination the message was accepted for
    pub topic: TopicId,
    /// The envelope as received
    pub envelope: Envelope,
    /// Acceptance time
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    topics: HashSet<TopicId>,
    /// Grows with every accept, only `clear` shrinks it
    messages: Vec<AcceptedMessage>,
}

/// Session handle of the in-memory backend. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    state: Arc<Mutex<MemoryState>>,
    latency: Duration,
}

impl MemorySession {
    /// Session accepting any non-empty topic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic. Once any topic is registered, only registered
    /// topics accept messages.
    #[must_use]
    pub fn with_topic(self, topic: impl Into<TopicId>) -> Self {
        self.create_topic(topic);
        self
    }

    /// Delay every publish by `latency`, to exercise cancellation and deadlines.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Register a topic on a live session.
    pub fn create_topic(&self, topic: impl Into<TopicId>) {
        self.state.lock().topics.insert(topic.into());
    }

    /// Snapshot of all accepted messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<AcceptedMessage> {
        self.state.lock().messages.clone()
    }

    /// Snapshot of messages accepted for `topic`.
    #[must_use]
    pub fn messages_for(&self, topic: &TopicId) -> Vec<AcceptedMessage> {
        self.state.lock().messages.iter().filter(|m| &m.topic == topic).cloned().collect()
    }

    /// Number of accepted messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().messages.len()
    }

    /// Whether no message has been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.lock().messages.is_empty()
    }

    /// Drop all accepted messages. Registered topics are kept.
    pub fn clear(&self) {
        self.state.lock().messages.clear();
    }
}

impl BackendSession for MemorySession {
    type Client = MemoryClient;

    fn publish_client(&self) -> MemoryClient {
        MemoryClient { state: Arc::clone(&self.state), latency: self.latency }
    }
}

/// Publishing client of the in-memory backend.
#[derive(Debug, Clone)]
pub struct MemoryClient {
    state: Arc<Mutex<MemoryState>>,
    latency: Duration,
}

impl MemoryClient {
    fn accept(&self, envelope: Envelope) -> Result<DeliveryId, BackendError> {
        let topic = envelope.destination.clone().unwrap_or_default();
        let mut state = self.state.lock();

        let registered = state.topics.is_empty() || state.topics.contains(&topic);
        if topic.is_empty() || !registered {
            return Err(BackendError::TopicNotFound { topic });
        }

        let delivery_id = DeliveryId::new(Uuid::new_v4().to_string());
        trace!(topic = %topic, delivery_id = %delivery_id, "Accepted message");

        state.messages.push(AcceptedMessage {
            delivery_id: delivery_id.clone(),
            topic,
            envelope,
            accepted_at: Utc::now(),
        });
        Ok(delivery_id)
    }
}

#[async_trait]
impl PublishClient for MemoryClient {
    async fn publish(
        &self,
        ctx: &PublishContext,
        envelope: Envelope,
    ) -> Result<DeliveryId, BackendError> {
        ctx.run(async move {
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.accept(envelope)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topicast_core::ContextError;

    fn to(topic: &str, body: &str) -> Envelope {
        Envelope::builder().destination(topic).body(body).build()
    }

    #[tokio::test]
    async fn test_accepts_and_records() {
        let session = MemorySession::new();
        let client = session.publish_client();
        let ctx = PublishContext::new();

        let first = client.publish(&ctx, to("a", "1")).await.unwrap();
        let second = client.publish(&ctx, to("b", "2")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(session.len(), 2);
        assert_eq!(session.messages()[0].delivery_id, first);
        assert_eq!(session.messages_for(&TopicId::new("b"))[0].envelope.body, "2");

        session.clear();
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_missing_destination_is_rejected() {
        let session = MemorySession::new();
        let client = session.publish_client();

        let result = client.publish(&PublishContext::new(), Envelope::new("x")).await;
        assert_eq!(result, Err(BackendError::TopicNotFound { topic: TopicId::default() }));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_registry_restricts_topics() {
        let session = MemorySession::new().with_topic("known");
        let client = session.publish_client();
        let ctx = PublishContext::new();

        assert!(client.publish(&ctx, to("known", "ok")).await.is_ok());
        assert_eq!(
            client.publish(&ctx, to("unknown", "no")).await,
            Err(BackendError::TopicNotFound { topic: TopicId::new("unknown") })
        );

        session.create_topic("unknown");
        assert!(client.publish(&ctx, to("unknown", "now ok")).await.is_ok());
        assert_eq!(session.len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_context_is_not_accepted() {
        let session = MemorySession::new();
        let ctx = PublishContext::new();
        ctx.cancel();

        let result = session.publish_client().publish(&ctx, to("a", "1")).await;
        assert_eq!(result, Err(BackendError::Context(ContextError::Cancelled)));
        assert!(session.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_past_deadline() {
        let session = MemorySession::new().with_latency(Duration::from_secs(1));
        let ctx = PublishContext::new().with_timeout(Duration::from_millis(100));

        let result = session.publish_client().publish(&ctx, to("a", "1")).await;
        assert_eq!(result, Err(BackendError::Context(ContextError::DeadlineExceeded)));
        assert!(session.is_empty());
    }
}
