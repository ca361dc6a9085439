//! Message envelope types shared by publishers and backends.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Backend-assigned topic resource name.
///
/// Topic identifiers are opaque: nothing here checks their shape. A malformed
/// identifier is reported by the backend when a message is published to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(String);

impl TopicId {
    /// Create a topic identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TopicId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TopicId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier the backend assigns to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(String);

impl DeliveryId {
    /// Wrap a backend-assigned identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for DeliveryId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DeliveryId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Typed value of a message attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MessageAttribute {
    /// UTF-8 text
    String(String),
    /// Numeric value carried in its textual form
    Number(String),
    /// List of strings
    StringArray(Vec<String>),
    /// Opaque bytes
    Binary(Bytes),
}

impl MessageAttribute {
    /// Build a numeric attribute from anything with a decimal representation.
    #[must_use]
    pub fn number(value: impl fmt::Display) -> Self {
        Self::Number(value.to_string())
    }

    /// Name of the attribute's data type as pub/sub backends usually spell it.
    #[must_use]
    pub const fn data_type(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Number(_) => "Number",
            Self::StringArray(_) => "String.Array",
            Self::Binary(_) => "Binary",
        }
    }
}

impl From<&str> for MessageAttribute {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for MessageAttribute {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Bytes> for MessageAttribute {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

/// Everything a backend accepts for one publish request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Destination topic
    pub destination: Option<TopicId>,

    /// Text body
    pub body: String,

    /// Structured attributes delivered alongside the body
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, MessageAttribute>,

    /// Optional subject line, for backends that fan out to e-mail style endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Ordering group for FIFO topics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,

    /// Deduplication token for FIFO topics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deduplication_id: Option<String>,
}

impl Envelope {
    /// Create an envelope carrying only a body.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into(), ..Self::default() }
    }

    /// Create an envelope builder for more complex construction.
    #[must_use]
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::default()
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&MessageAttribute> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value if any.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<MessageAttribute>,
    ) -> Option<MessageAttribute> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Body size in bytes.
    #[must_use]
    pub fn body_size(&self) -> usize {
        self.body.len()
    }
}

/// Builder for [`Envelope`].
#[derive(Debug, Default)]
pub struct EnvelopeBuilder {
    envelope: Envelope,
}

impl EnvelopeBuilder {
    /// Set the destination topic.
    #[must_use]
    pub fn destination(mut self, topic: impl Into<TopicId>) -> Self {
        self.envelope.destination = Some(topic.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.envelope.body = body.into();
        self
    }

    /// Add an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<MessageAttribute>) -> Self {
        self.envelope.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the subject.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.envelope.subject = Some(subject.into());
        self
    }

    /// Set the ordering group.
    #[must_use]
    pub fn group_id(mut self, group_id: impl Into<String>) -> Self {
        self.envelope.group_id = Some(group_id.into());
        self
    }

    /// Set the deduplication token.
    #[must_use]
    pub fn deduplication_id(mut self, deduplication_id: impl Into<String>) -> Self {
        self.envelope.deduplication_id = Some(deduplication_id.into());
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Envelope {
        self.envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_new_only_sets_body() {
        let envelope = Envelope::new("hello");

        assert_eq!(envelope.body, "hello");
        assert!(envelope.destination.is_none());
        assert!(envelope.attributes.is_empty());
        assert!(envelope.subject.is_none());
    }

    #[test]
    fn test_envelope_builder() {
        let envelope = Envelope::builder()
            .destination("orders")
            .body("{}")
            .attribute("kind", "created")
            .attribute("version", MessageAttribute::number(2))
            .subject("order created")
            .group_id("customer-7")
            .build();

        assert_eq!(envelope.destination, Some(TopicId::new("orders")));
        assert_eq!(envelope.attribute("kind"), Some(&MessageAttribute::from("created")));
        assert_eq!(envelope.attribute("version"), Some(&MessageAttribute::Number("2".into())));
        assert_eq!(envelope.subject.as_deref(), Some("order created"));
        assert_eq!(envelope.group_id.as_deref(), Some("customer-7"));
        assert!(envelope.deduplication_id.is_none());
    }

    #[test]
    fn test_set_attribute_replaces() {
        let mut envelope = Envelope::new("x");
        assert!(envelope.set_attribute("a", "1").is_none());
        let previous = envelope.set_attribute("a", "2");

        assert_eq!(previous, Some(MessageAttribute::String("1".into())));
        assert_eq!(envelope.attribute("a"), Some(&MessageAttribute::String("2".into())));
    }

    #[test]
    fn test_topic_id_is_not_validated() {
        assert!(TopicId::new("").is_empty());
        assert_eq!(TopicId::new("not a valid arn!").as_str(), "not a valid arn!");
    }

    #[test]
    fn test_attribute_data_types() {
        assert_eq!(MessageAttribute::from("a").data_type(), "String");
        assert_eq!(MessageAttribute::number(1.5).data_type(), "Number");
        assert_eq!(MessageAttribute::StringArray(vec![]).data_type(), "String.Array");
        assert_eq!(MessageAttribute::from(Bytes::from_static(b"\x01")).data_type(), "Binary");
    }

    #[test]
    fn test_envelope_serde_skips_empty_fields() {
        let envelope = Envelope::builder().destination("t").body("b").build();
        let json = serde_json::to_string(&envelope).unwrap();

        assert_eq!(json, r#"{"destination":"t","body":"b"}"#);
    }

    #[test]
    fn test_delivery_id_compares_with_str() {
        let id = DeliveryId::new("msg-123");
        assert_eq!(id, "msg-123");
        assert_eq!(id.to_string(), "msg-123");
    }
}
