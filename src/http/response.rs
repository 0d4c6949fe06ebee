//! Response decoding.
//!
//! # Responsibilities
//! - Model a fully buffered response as returned by a transport
//! - Detect structured bodies from the declared `Content-Type`
//! - Decode the body exactly once into a [`Payload`]
//!
//! # Design Decisions
//! - Detection is a substring match on the header value, not a media-type parse
//! - Missing or non-ASCII content types fall back to text
//! - Text decoding is lossy: invalid UTF-8 becomes U+FFFD rather than failing
//! - A leading UTF-8 byte-order mark is dropped on both paths

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Marker that identifies a structured (JSON) body.
pub const STRUCTURED_MARKER: &str = "application/json";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A fully buffered HTTP response as handed back by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Final URL of the response (after redirects, if any).
    pub url: String,

    pub status: StatusCode,

    /// Reason phrase (e.g. `"Not Found"`).
    pub status_text: String,

    pub headers: HeaderMap,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// The declared content type, if present and representable as text.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Whether the body should be parsed as structured data.
    pub fn is_structured(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.contains(STRUCTURED_MARKER))
    }

    /// Decode the body according to the declared content type.
    pub fn decode(&self) -> Result<Payload, serde_json::Error> {
        let body = self
            .body
            .strip_prefix(UTF8_BOM)
            .unwrap_or(self.body.as_slice());
        if self.is_structured() {
            serde_json::from_slice(body).map(Payload::Json)
        } else {
            Ok(Payload::Text(String::from_utf8_lossy(body).into_owned()))
        }
    }
}

/// A decoded response body.
///
/// Serializes untagged: JSON payloads as the value itself, text as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(v) => Some(v),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(_) => None,
        }
    }

    /// Convert into a JSON value; text becomes a JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Payload::Json(v) => v,
            Payload::Text(s) => Value::String(s),
        }
    }

    /// Deserialize the payload into a concrete type.
    pub fn parse<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde::Deserialize;
    use serde_json::json;

    fn response(content_type: Option<&'static str>, body: &[u8]) -> RawResponse {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        RawResponse {
            url: "http://localhost/".to_string(),
            status: StatusCode::OK,
            status_text: "OK".to_string(),
            headers,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_structured_detection_is_substring() {
        assert!(response(Some("application/json"), b"").is_structured());
        assert!(response(Some("application/json; charset=utf-8"), b"").is_structured());
        assert!(!response(Some("application/vnd.api+json"), b"").is_structured());
        assert!(!response(Some("text/plain"), b"").is_structured());
        assert!(!response(None, b"").is_structured());
    }

    #[test]
    fn test_decode_json() {
        let payload = response(Some("application/json"), br#"{"id":1}"#).decode().unwrap();
        assert_eq!(payload, Payload::Json(json!({"id": 1})));
    }

    #[test]
    fn test_decode_text_fallback() {
        let payload = response(Some("text/plain"), b"ok").decode().unwrap();
        assert_eq!(payload, Payload::Text("ok".into()));

        // JSON-looking body without the marker stays text
        let payload = response(None, br#"{"id":1}"#).decode().unwrap();
        assert_eq!(payload.as_text(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_decode_malformed_json_fails() {
        assert!(response(Some("application/json"), b"{not json").decode().is_err());
        assert!(response(Some("application/json"), b"").decode().is_err());
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let payload = response(Some("text/plain"), &[b'o', 0xff, b'k']).decode().unwrap();
        assert_eq!(payload.as_text(), Some("o\u{fffd}k"));
    }

    #[test]
    fn test_decode_strips_byte_order_mark() {
        let payload = response(Some("application/json"), b"\xEF\xBB\xBF{\"id\":1}")
            .decode()
            .unwrap();
        assert_eq!(payload, Payload::Json(json!({"id": 1})));

        let payload = response(Some("text/plain"), b"\xEF\xBB\xBFok").decode().unwrap();
        assert_eq!(payload, Payload::Text("ok".into()));

        // Only a leading mark is dropped
        let payload = response(Some("text/plain"), b"o\xEF\xBB\xBFk").decode().unwrap();
        assert_eq!(payload.as_text(), Some("o\u{feff}k"));
    }

    #[test]
    fn test_payload_parse() {
        #[derive(Deserialize, Debug, PartialEq)]
        struct Item {
            id: u32,
        }

        let item: Item = Payload::Json(json!({"id": 7})).parse().unwrap();
        assert_eq!(item, Item { id: 7 });

        let text: String = Payload::Text("ok".into()).parse().unwrap();
        assert_eq!(text, "ok");

        assert!(Payload::Text("ok".into()).parse::<Item>().is_err());
    }

    #[test]
    fn test_payload_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Payload::Text("ok".into())).unwrap(), r#""ok""#);
        assert_eq!(
            serde_json::to_string(&Payload::Json(json!({"a": [1]}))).unwrap(),
            r#"{"a":[1]}"#
        );
    }
}
