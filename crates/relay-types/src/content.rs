//! Sum-type model for the dynamic shapes found inside request bodies.
//!
//! Provider request bodies carry `messages[*].content` as either a plain
//! string or an array of typed parts (OpenAI-style multimodal). JSON gives
//! no static guarantee of which; decoding is permissive and best-effort so a
//! malformed or unexpected shape never fails the surrounding parse.

use serde::Deserialize;
use serde_json::Value;

/// The `content` field of a single message.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// One element of an array-shaped `content` field.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { url: String },
    Image,
    Unknown,
}

impl Content {
    /// Decode a `content` value permissively. Never fails: anything that
    /// isn't a recognizable string or array collapses to an empty text part
    /// rather than aborting the caller's parse.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Content::Text(s.clone()),
            Value::Array(items) => Content::Parts(items.iter().map(ContentPart::from_value).collect()),
            Value::Object(_) => Content::Parts(vec![ContentPart::from_value(value)]),
            _ => Content::Text(String::new()),
        }
    }

    /// True when this content contains at least one image part, per the
    /// vision-detection rules: an array element with `type` of
    /// `"image_url"`/`"image"`, or a text element whose `text` begins with
    /// `data:image/`. A plain string content never indicates vision.
    pub fn indicates_vision(&self) -> bool {
        match self {
            Content::Text(_) => false,
            Content::Parts(parts) => parts.iter().any(|p| match p {
                ContentPart::ImageUrl { .. } | ContentPart::Image => true,
                ContentPart::Text { text } => text.starts_with("data:image/"),
                ContentPart::Unknown => false,
            }),
        }
    }
}

impl ContentPart {
    fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return ContentPart::Unknown;
        };

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or("");
        match kind {
            "text" => {
                let text = obj.get("text").and_then(Value::as_str).unwrap_or("").to_string();
                ContentPart::Text { text }
            }
            "image_url" => {
                let url = obj
                    .get("image_url")
                    .and_then(|v| v.get("url"))
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string();
                ContentPart::ImageUrl { url }
            }
            "image" => ContentPart::Image,
            _ => ContentPart::Unknown,
        }
    }
}

/// Minimal shape used for the fast-path `{"model": string}` decode attempt.
#[derive(Debug, Deserialize)]
pub struct ModelOnly {
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_content_is_never_vision() {
        let c = Content::from_value(&json!("data:image/png;base64,AAA"));
        assert!(!c.indicates_vision());
    }

    #[test]
    fn image_url_part_indicates_vision() {
        let c = Content::from_value(&json!([
            {"type": "text", "text": "describe"},
            {"type": "image_url", "image_url": {"url": "https://ex/i.jpg"}}
        ]));
        assert!(c.indicates_vision());
    }

    #[test]
    fn data_uri_text_part_indicates_vision() {
        let c = Content::from_value(&json!([
            {"type": "text", "text": "data:image/png;base64,AAA"}
        ]));
        assert!(c.indicates_vision());
    }

    #[test]
    fn unknown_shapes_decode_without_panicking() {
        let c = Content::from_value(&json!(42));
        assert_eq!(c, Content::Text(String::new()));
    }
}
