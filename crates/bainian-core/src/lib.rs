//! Core domain types and error definitions for bainian.
//!
//! This crate provides the types shared by the config, provider and server crates:
//!
//! - [`ReplyError`] — Error type for provider calls and reply normalization
//! - [`ReplySet`], [`Reply`] and [`ReplyKind`] — The structured reply suggestions
//! - [`ImagePayload`] and [`MediaType`] — An uploaded screenshot ready to forward
//! - [`ModelProfile`] — A selectable vision model
//!
//! # Example
//!
//! ```rust
//! use bainian_core::{ImagePayload, MediaType};
//!
//! let image = ImagePayload::new(vec![0xff, 0xd8, 0xff], MediaType::from_declared(Some("image/heic")));
//! assert_eq!(image.media_type, MediaType::Jpeg);
//! assert!(image.data_uri().starts_with("data:image/jpeg;base64,"));
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of reply variants a well-formed [`ReplySet`] carries.
pub const REPLY_COUNT: usize = 3;

/// Errors that can occur while producing a [`ReplySet`].
#[derive(Error, Debug)]
pub enum ReplyError {
    /// Provider request failed or returned a non-success status.
    #[error("LLM request failed: {0}")]
    Provider(String),

    /// Provider did not answer within the configured timeout.
    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    /// Provider answered without any completion text.
    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    /// Completion text was not valid JSON after fence stripping.
    #[error("Failed to parse structured output: {0}")]
    Parse(String),

    /// Completion parsed as JSON but does not describe a reply set.
    #[error("Malformed reply set: {0}")]
    MalformedReplySet(String),
}

impl From<serde_json::Error> for ReplyError {
    fn from(err: serde_json::Error) -> Self {
        ReplyError::Parse(err.to_string())
    }
}

/// Tone of a single reply suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    /// Warm and respectful, for elders and family.
    Formal,
    /// Playful, for friends.
    Humor,
    /// Brief, for colleagues and clients.
    Short,
}

impl ReplyKind {
    /// All kinds a reply set must cover.
    pub const ALL: [ReplyKind; REPLY_COUNT] = [ReplyKind::Formal, ReplyKind::Humor, ReplyKind::Short];
}

/// One reply suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub label: String,
    pub text: String,
}

/// The structured result returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplySet {
    /// Short summary of who sent the greeting and what it says.
    pub recognized: String,
    /// Reply variants in the order the model produced them.
    pub replies: Vec<Reply>,
}

impl ReplySet {
    /// Validates a normalized completion and converts it into a reply set.
    ///
    /// The value must carry a string `recognized`, and `replies` must hold
    /// exactly one reply of each [`ReplyKind`], in any order.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ReplyError> {
        let set: ReplySet = serde_json::from_value(value)
            .map_err(|e| ReplyError::MalformedReplySet(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<(), ReplyError> {
        if self.replies.len() != REPLY_COUNT {
            return Err(ReplyError::MalformedReplySet(format!(
                "expected {} replies, got {}",
                REPLY_COUNT,
                self.replies.len()
            )));
        }

        let missing: Vec<ReplyKind> = ReplyKind::ALL
            .into_iter()
            .filter(|kind| !self.replies.iter().any(|r| r.kind == *kind))
            .collect();

        match missing.is_empty() {
            true => Ok(()),
            false => Err(ReplyError::MalformedReplySet(format!(
                "missing reply types: {:?}",
                missing
            ))),
        }
    }
}

/// Image formats the provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    #[default]
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl MediaType {
    /// Maps a declared content type onto the allow-list.
    ///
    /// Anything not exactly matching one of the four supported types, including
    /// an absent content type, becomes [`MediaType::Jpeg`].
    pub fn from_declared(declared: Option<&str>) -> Self {
        match declared {
            Some("image/jpeg") => MediaType::Jpeg,
            Some("image/png") => MediaType::Png,
            Some("image/gif") => MediaType::Gif,
            Some("image/webp") => MediaType::Webp,
            _ => MediaType::Jpeg,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Gif => "image/gif",
            MediaType::Webp => "image/webp",
        }
    }
}

/// An uploaded image, already coerced to a supported media type.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub media_type: MediaType,
}

impl ImagePayload {
    pub fn new(bytes: Vec<u8>, media_type: MediaType) -> Self {
        Self { bytes, media_type }
    }

    /// Encodes the image as a `data:` URI with standard base64.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type.as_mime(), STANDARD.encode(&self.bytes))
    }
}

/// A single generate call: one image plus the caller's model selector.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub image: ImagePayload,
    /// Selector key as submitted. `None` when the field was absent or blank.
    pub model_key: Option<String>,
}

/// A selectable vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelProfile {
    /// Selector key used by callers, e.g. `gemini-flash`.
    pub key: String,
    /// Human-readable display label.
    pub label: String,
    /// Provider-specific model identifier.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "recognized": "朋友张三发来蛇年祝福",
            "replies": [
                {"type": "formal", "label": "🎩 正式温馨", "text": "谢谢你的祝福"},
                {"type": "humor", "label": "😄 幽默俏皮", "text": "蛇年一起发财"},
                {"type": "short", "label": "⚡ 简短精炼", "text": "同乐！"}
            ]
        })
    }

    #[test]
    fn test_media_type_allow_list() {
        assert_eq!(MediaType::from_declared(Some("image/png")), MediaType::Png);
        assert_eq!(MediaType::from_declared(Some("image/gif")), MediaType::Gif);
        assert_eq!(MediaType::from_declared(Some("image/webp")), MediaType::Webp);
        assert_eq!(MediaType::from_declared(Some("image/jpeg")), MediaType::Jpeg);
    }

    #[test]
    fn test_media_type_coerces_unknown_to_jpeg() {
        for declared in ["image/heic", "image/bmp", "application/octet-stream", "IMAGE/PNG", "text/plain", ""] {
            assert_eq!(MediaType::from_declared(Some(declared)).as_mime(), "image/jpeg", "{declared}");
        }
        assert_eq!(MediaType::from_declared(None), MediaType::Jpeg);
    }

    #[test]
    fn test_data_uri() {
        let image = ImagePayload::new(b"hello".to_vec(), MediaType::Png);
        assert_eq!(image.data_uri(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_reply_set_from_value() {
        let set = ReplySet::from_value(sample()).unwrap();
        assert_eq!(set.recognized, "朋友张三发来蛇年祝福");
        assert_eq!(set.replies.len(), 3);
        assert_eq!(set.replies[1].kind, ReplyKind::Humor);
        assert_eq!(serde_json::to_value(&set).unwrap(), sample());
    }

    #[test]
    fn test_reply_set_accepts_any_order() {
        let mut value = sample();
        value["replies"].as_array_mut().unwrap().reverse();
        let set = ReplySet::from_value(value).unwrap();
        assert_eq!(set.replies[0].kind, ReplyKind::Short);
    }

    #[test]
    fn test_reply_set_rejects_wrong_count() {
        let mut value = sample();
        value["replies"].as_array_mut().unwrap().pop();
        let err = ReplySet::from_value(value).unwrap_err();
        assert!(matches!(err, ReplyError::MalformedReplySet(_)));
        assert!(err.to_string().contains("expected 3 replies, got 2"));
    }

    #[test]
    fn test_reply_set_rejects_duplicate_kind() {
        let mut value = sample();
        value["replies"][2]["type"] = json!("formal");
        let err = ReplySet::from_value(value).unwrap_err();
        assert!(err.to_string().contains("Short"));
    }

    #[test]
    fn test_reply_set_rejects_unknown_kind_and_missing_fields() {
        let mut value = sample();
        value["replies"][0]["type"] = json!("sarcastic");
        assert!(matches!(ReplySet::from_value(value), Err(ReplyError::MalformedReplySet(_))));

        assert!(matches!(
            ReplySet::from_value(json!({"replies": []})),
            Err(ReplyError::MalformedReplySet(_))
        ));
        assert!(matches!(
            ReplySet::from_value(json!(["not", "an", "object"])),
            Err(ReplyError::MalformedReplySet(_))
        ));
    }
}
