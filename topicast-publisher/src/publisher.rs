//! Core publisher implementation.

use crate::backend::{BackendSession, PublishClient};
use crate::config::PublisherConfig;
use crate::encoding::Encoding;
use crate::error::{PublishError, Result};
use serde::Serialize;
use topicast_core::{DeliveryId, Envelope, PublishContext, TopicId};
use tracing::{debug, warn};

/// Publishes messages to the single topic it was configured with.
///
/// A publisher holds its configuration and a backend client handle and
/// nothing else, so one instance can be shared by any number of tasks.
#[derive(Debug, Clone)]
pub struct Publisher<C> {
    client: C,
    config: PublisherConfig,
}

impl<C: PublishClient> Publisher<C> {
    /// Create a publisher from a caller-owned backend session.
    ///
    /// An empty `config.encoding` is replaced with `json`.
    pub fn new<S>(session: &S, config: PublisherConfig) -> Self
    where
        S: BackendSession<Client = C>,
    {
        Self::with_client(session.publish_client(), config)
    }

    /// Create a publisher around an existing client handle.
    ///
    /// Applies the same defaulting as [`Publisher::new`].
    pub fn with_client(client: C, config: PublisherConfig) -> Self {
        let config = config.with_defaults();
        debug!(topic = %config.topic, encoding = %config.encoding, "Publisher created");
        Self { client, config }
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Topic all messages are published to.
    #[must_use]
    pub const fn topic(&self) -> &TopicId {
        &self.config.topic
    }

    /// Backend client handle.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Send a fully built envelope.
    ///
    /// The envelope's destination is always replaced with this publisher's
    /// topic. Exactly one backend call is made.
    ///
    /// # Errors
    /// Returns [`PublishError::Backend`] with the backend's error unchanged.
    pub async fn publish_input(
        &self,
        ctx: &PublishContext,
        mut envelope: Envelope,
    ) -> Result<DeliveryId> {
        envelope.destination = Some(self.config.topic.clone());

        match self.client.publish(ctx, envelope).await {
            Ok(delivery_id) => {
                debug!(topic = %self.config.topic, delivery_id = %delivery_id, "Message published");
                Ok(delivery_id)
            },
            Err(err) => {
                warn!(topic = %self.config.topic, error = %err, "Publish failed");
                Err(PublishError::Backend(err))
            },
        }
    }

    /// Encode `value` with the configured encoding and send it as the body
    /// of an otherwise empty envelope.
    ///
    /// # Errors
    /// - [`PublishError::UnsupportedEncoding`] if the encoding name is unknown
    /// - [`PublishError::Encoding`] if the value cannot be encoded
    /// - [`PublishError::Backend`] if the backend call fails
    ///
    /// The first two are returned without contacting the backend.
    pub async fn publish<T>(&self, ctx: &PublishContext, value: &T) -> Result<DeliveryId>
    where
        T: Serialize + ?Sized,
    {
        let body = self.encode_body(value)?;
        self.publish_input(ctx, Envelope::new(body)).await
    }

    /// Encode `value` the way [`Publisher::publish`] would, without sending it.
    ///
    /// # Errors
    /// Same encode-time errors as [`Publisher::publish`].
    pub fn encode_body<T>(&self, value: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let encoding: Encoding = self.config.encoding()?;
        encoding.encode(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySession;
    use serde_json::json;

    #[test]
    fn test_new_defaults_encoding_to_json() {
        let session = MemorySession::new();
        let publisher = Publisher::new(&session, PublisherConfig::new("orders"));

        assert_eq!(publisher.config().encoding, "json");
        assert_eq!(publisher.topic().as_str(), "orders");
    }

    #[test]
    fn test_encode_body_follows_config() {
        let session = MemorySession::new();
        let value = json!({"a": 1});

        let json = Publisher::new(&session, PublisherConfig::new("t"));
        assert_eq!(json.encode_body(&value).unwrap(), r#"{"a":1}"#);

        let raw = Publisher::new(&session, PublisherConfig::new("t").with_encoding("raw"));
        assert_eq!(raw.encode_body(&value).unwrap(), "map[a:1]");
    }

    #[tokio::test]
    async fn test_publish_lands_on_configured_topic() {
        let session = MemorySession::new();
        let publisher = Publisher::new(&session, PublisherConfig::new("orders"));

        let id = publisher.publish(&PublishContext::new(), &json!({"id": 7})).await.unwrap();

        let accepted = session.messages();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].delivery_id, id);
        assert_eq!(accepted[0].topic.as_str(), "orders");
        assert_eq!(accepted[0].envelope.body, r#"{"id":7}"#);
        assert!(accepted[0].envelope.attributes.is_empty());
    }
}
