//! Capability traits a messaging backend provides to the publisher.
//!
//! The publisher needs exactly two things from a backend: a way to get a
//! publishing client out of an already established session, and a
//! context-aware publish call. Sessions, credentials, retries and transport
//! all stay on the backend's side of these traits.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use topicast_core::{ContextError, DeliveryId, Envelope, PublishContext, TopicId};

/// Failure reported by a backend publish call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Credentials do not allow publishing to the topic
    #[error("not authorized to publish to {topic}: {message}")]
    Unauthorized {
        /// Destination of the rejected request
        topic: TopicId,
        /// Backend-provided reason
        message: String,
    },

    /// The destination topic does not exist
    #[error("topic not found: {topic}")]
    TopicNotFound {
        /// Destination of the rejected request
        topic: TopicId,
    },

    /// The backend is rate limiting this caller
    #[error("publish throttled: {message}")]
    Throttled {
        /// Backend-provided reason
        message: String,
    },

    /// The backend refused the message content
    #[error("message rejected: {message}")]
    Rejected {
        /// Backend-provided reason
        message: String,
    },

    /// The request did not reach the backend or the response was lost
    #[error("transport failure: {message}")]
    Transport {
        /// Backend-provided reason
        message: String,
    },

    /// The publish context ended before the backend answered
    #[error(transparent)]
    Context(#[from] ContextError),
}

/// An established connection to a backend, owned by the caller.
pub trait BackendSession {
    /// Client type produced by this session
    type Client: PublishClient;

    /// Produce a publishing client bound to this session.
    fn publish_client(&self) -> Self::Client;
}

/// Context-aware publish call of a backend client.
#[async_trait]
pub trait PublishClient: Send + Sync {
    /// Submit one envelope and return the backend's delivery id.
    ///
    /// Implementations should stop early when `ctx` is cancelled or expires.
    async fn publish(
        &self,
        ctx: &PublishContext,
        envelope: Envelope,
    ) -> Result<DeliveryId, BackendError>;
}

#[async_trait]
impl<C: PublishClient + ?Sized> PublishClient for Arc<C> {
    async fn publish(
        &self,
        ctx: &PublishContext,
        envelope: Envelope,
    ) -> Result<DeliveryId, BackendError> {
        (**self).publish(ctx, envelope).await
    }
}

#[async_trait]
impl<C: PublishClient + ?Sized> PublishClient for Box<C> {
    async fn publish(
        &self,
        ctx: &PublishContext,
        envelope: Envelope,
    ) -> Result<DeliveryId, BackendError> {
        (**self).publish(ctx, envelope).await
    }
}
