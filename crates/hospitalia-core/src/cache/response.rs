use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Status of the placeholder served when neither cache nor network answer.
pub const OFFLINE_STATUS: u16 = 503;

/// Body of the placeholder served when neither cache nor network answer.
pub const OFFLINE_BODY: &str = "Offline content unavailable";

/// A response as stored in, and served from, a cache store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, content_type: Option<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// The fixed 503 placeholder.
    pub fn offline() -> Self {
        Self::new(
            OFFLINE_STATUS,
            Some("text/plain".to_string()),
            OFFLINE_BODY.as_bytes(),
        )
    }

    /// 2xx status
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

mod body_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}
