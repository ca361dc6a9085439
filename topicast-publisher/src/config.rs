//! Publisher configuration types.

use crate::encoding::Encoding;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use topicast_core::{ConfigLoader, LoggingConfig, TopicId};

/// Configuration for a [`Publisher`](crate::Publisher).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    /// Body encoding name, `"raw"` or `"json"`. Empty means `"json"`.
    ///
    /// Kept as text so a misconfigured name is reported when publishing
    /// rather than rejected while loading.
    pub encoding: String,

    /// Topic every message is published to
    pub topic: TopicId,
}

impl PublisherConfig {
    /// Configuration for `topic` with the default encoding.
    #[must_use]
    pub fn new(topic: impl Into<TopicId>) -> Self {
        Self { encoding: String::new(), topic: topic.into() }
    }

    /// Set the encoding name.
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Resolve the configured encoding name.
    ///
    /// # Errors
    /// Returns [`PublishError::UnsupportedEncoding`](crate::PublishError::UnsupportedEncoding)
    /// for names other than `raw` and `json`.
    pub fn encoding(&self) -> Result<Encoding> {
        self.encoding.parse()
    }

    pub(crate) fn with_defaults(mut self) -> Self {
        if self.encoding.is_empty() {
            self.encoding = Encoding::default().into();
        }
        self
    }
}

/// Top-level settings file layout.
///
/// ```toml
/// [publisher]
/// topic = "arn:aws:sns:eu-west-1:123456789012:orders"
/// encoding = "json"
///
/// [logging]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Publisher section
    pub publisher: PublisherConfig,
    /// Logging section
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loader with the publisher's text-only keys registered, so that e.g. a
    /// numeric topic name in `TOPICAST_PUBLISHER_TOPIC` stays a string.
    #[must_use]
    pub fn loader() -> ConfigLoader {
        ConfigLoader::new()
            .with_string_key("publisher.topic")
            .with_string_key("publisher.encoding")
    }

    /// Load settings from the default search paths and the environment.
    ///
    /// # Errors
    /// See [`ConfigLoader::load`].
    pub fn load() -> topicast_core::Result<Self> {
        Self::loader().load()
    }

    /// Load settings from `path`, then apply environment overrides.
    ///
    /// # Errors
    /// See [`ConfigLoader::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> topicast_core::Result<Self> {
        Self::loader().with_file(path).load()
    }
}
