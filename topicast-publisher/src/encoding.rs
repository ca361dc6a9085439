//! Body encodings.

use crate::error::{PublishError, Result};
use crate::{json, raw};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a caller value becomes a message body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Plain text rendering, see [`raw`](crate::raw)
    Raw,
    /// Compact JSON
    #[default]
    Json,
}

impl Encoding {
    /// Configuration name of the encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Json => "json",
        }
    }

    /// Encode `value` into a message body.
    ///
    /// # Errors
    /// Returns [`PublishError::Encoding`] when the value cannot be represented,
    /// e.g. a map with non-string keys or a NaN float under JSON.
    pub fn encode<T>(self, value: &T) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Self::Json => json::to_json_string(value)
                .map_err(|e| PublishError::Encoding { encoding: self, source: Box::new(e) }),
            Self::Raw => raw::to_raw_string(value)
                .map_err(|e| PublishError::Encoding { encoding: self, source: Box::new(e) }),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raw" => Ok(Self::Raw),
            "json" => Ok(Self::Json),
            other => Err(PublishError::UnsupportedEncoding { encoding: other.to_string() }),
        }
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_parse_known_names() {
        assert_eq!("raw".parse::<Encoding>().unwrap(), Encoding::Raw);
        assert_eq!("json".parse::<Encoding>().unwrap(), Encoding::Json);
        assert_eq!(Encoding::default(), Encoding::Json);
    }

    #[test]
    fn test_parse_is_exact() {
        for name in ["xml", "JSON", " json", ""] {
            match name.parse::<Encoding>() {
                Err(PublishError::UnsupportedEncoding { encoding }) => assert_eq!(encoding, name),
                other => panic!("expected unsupported encoding for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_json_is_compact() {
        let body = Encoding::Json.encode(&json!({"a": 1, "b": [true, null]})).unwrap();
        assert_eq!(body, r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn test_json_string_is_quoted_raw_is_not() {
        assert_eq!(Encoding::Json.encode("hi").unwrap(), r#""hi""#);
        assert_eq!(Encoding::Raw.encode("hi").unwrap(), "hi");
    }

    #[test]
    fn test_json_rejects_non_string_keys() {
        let mut map = HashMap::new();
        map.insert((1u8, 2u8), 3u8);

        let err = Encoding::Json.encode(&map).unwrap_err();
        assert!(matches!(err, PublishError::Encoding { encoding: Encoding::Json, .. }));
        assert!(err.to_string().starts_with("failed to encode message body as json"));
    }

    #[test]
    fn test_round_trip_through_string() {
        for encoding in [Encoding::Raw, Encoding::Json] {
            let name: String = encoding.into();
            assert_eq!(name.parse::<Encoding>().unwrap(), encoding);
            assert_eq!(encoding.to_string(), name);
        }
    }
}
