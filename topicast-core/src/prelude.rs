//! # Prelude
//!
//! Commonly used types from Topicast Core.

pub use crate::{
    config::ConfigLoader,
    context::{ContextError, PublishContext},
    error::{Error, Result},
    message::{DeliveryId, Envelope, EnvelopeBuilder, MessageAttribute, TopicId},
    telemetry::{init_logging, LoggingConfig},
};

pub use bytes::Bytes;
pub use serde::{Deserialize, Serialize};
