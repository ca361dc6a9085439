//! # Topicast Publisher
//!
//! Topic-bound message publisher for pub/sub backends.
//!
//! A [`Publisher`] is configured with one topic and one body encoding and
//! offers two operations:
//! - [`Publisher::publish_input`] sends a caller-built [`Envelope`], always to
//!   the configured topic
//! - [`Publisher::publish`] encodes any `Serialize` value as `json` or `raw`
//!   text and sends it
//!
//! The backend sits behind the [`BackendSession`] and [`PublishClient`]
//! traits. Sessions, credentials and retries are the backend's business.
//!
//! ## Examples
//!
//! ```rust
//! use topicast_publisher::{MemorySession, Publisher, PublisherConfig};
//! use topicast_core::PublishContext;
//! use serde_json::json;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MemorySession::new();
//! let publisher = Publisher::new(&session, PublisherConfig::new("orders"));
//!
//! let id = publisher.publish(&PublishContext::new(), &json!({"a": 1})).await?;
//! assert_eq!(session.messages()[0].delivery_id, id);
//! assert_eq!(session.messages()[0].envelope.body, r#"{"a":1}"#);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod config;
pub mod encoding;
pub mod error;
mod json;
pub mod memory;
pub mod publisher;
pub mod raw;

pub use backend::{BackendError, BackendSession, PublishClient};
pub use config::{PublisherConfig, Settings};
pub use encoding::Encoding;
pub use error::{PublishError, Result};
pub use memory::{AcceptedMessage, MemoryClient, MemorySession};
pub use publisher::Publisher;
pub use topicast_core::{DeliveryId, Envelope, PublishContext, TopicId};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        BackendError, BackendSession, Encoding, PublishClient, PublishError, Publisher,
        PublisherConfig, Settings,
    };
    pub use topicast_core::prelude::*;
}
