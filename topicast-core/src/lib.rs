//! # Topicast Core
//!
//! Shared building blocks for publishing to topic-based pub/sub backends.
//!
//! ## Modules
//!
//! - [`message`]: envelope, topic and delivery identifier types
//! - [`context`]: cancellable, deadline-bearing publish context
//! - [`config`]: layered TOML/environment configuration loading
//! - [`telemetry`]: `tracing` subscriber setup
//! - [`error`]: error types and result handling
//! - [`prelude`]: common imports for convenient usage
//!
//! ## Quick Start
//!
//! ```rust
//! use topicast_core::{Envelope, PublishContext, TopicId};
//! use std::time::Duration;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let envelope = Envelope::builder()
//!     .destination(TopicId::new("orders"))
//!     .body(r#"{"id":1}"#)
//!     .attribute("kind", "created")
//!     .build();
//!
//! let ctx = PublishContext::new().with_timeout(Duration::from_secs(5));
//! assert!(ctx.check().is_ok());
//! assert_eq!(envelope.body_size(), 8);
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod context;
pub mod error;
pub mod message;
pub mod prelude;
pub mod telemetry;

pub use crate::{
    config::ConfigLoader,
    context::{ContextError, PublishContext},
    error::{Error, Result},
    message::{DeliveryId, Envelope, EnvelopeBuilder, MessageAttribute, TopicId},
    telemetry::{init_logging, LogFormat, LogLevel, LoggingConfig},
};
