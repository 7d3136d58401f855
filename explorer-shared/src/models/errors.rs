use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failed response carries nothing readable.
pub const DEFAULT_ERROR_MESSAGE: &str = "API Error";

/// Error payload returned by the API on non-2xx responses.
///
/// The server reports failures as `{"detail": "..."}`; request validation
/// failures use a list of `{"msg": "..."}` objects under the same key. A
/// plain `message` field is accepted as well.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ErrorBody {
    /// Human-readable detail, a string or a list of validation errors.
    #[serde(default)]
    pub detail: Option<Value>,
    /// Alternate message field.
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Parse a raw response body, returning `None` when it is not an object.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }

    /// The readable message carried by the payload, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let from_detail = match &self.detail {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Array(items)) => items
                .first()
                .and_then(|item| item.get("msg"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };

        from_detail
            .or_else(|| self.message.clone())
            .filter(|text| !text.trim().is_empty())
    }

    /// Extract the message from a raw body, falling back to
    /// [`DEFAULT_ERROR_MESSAGE`].
    #[must_use]
    pub fn message_or_default(body: &[u8]) -> String {
        Self::parse(body)
            .and_then(|payload| payload.message())
            .unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string() {
        assert_eq!(
            ErrorBody::message_or_default(br#"{"detail":"expired token"}"#),
            "expired token"
        );
    }

    #[test]
    fn validation_list_uses_first_msg() {
        let body = br#"{"detail":[{"loc":["query","query"],"msg":"field required","type":"missing"}]}"#;
        assert_eq!(ErrorBody::message_or_default(body), "field required");
    }

    #[test]
    fn message_field_is_accepted() {
        assert_eq!(
            ErrorBody::message_or_default(br#"{"message":"Conversation not found"}"#),
            "Conversation not found"
        );
    }

    #[test]
    fn unparsable_body_uses_default() {
        assert_eq!(
            ErrorBody::message_or_default(b"<html>502 Bad Gateway</html>"),
            DEFAULT_ERROR_MESSAGE
        );
        assert_eq!(ErrorBody::message_or_default(b""), DEFAULT_ERROR_MESSAGE);
    }

    #[test]
    fn blank_or_missing_detail_uses_default() {
        assert_eq!(ErrorBody::message_or_default(br#"{}"#), DEFAULT_ERROR_MESSAGE);
        assert_eq!(
            ErrorBody::message_or_default(br#"{"detail":"  "}"#),
            DEFAULT_ERROR_MESSAGE
        );
        assert_eq!(
            ErrorBody::message_or_default(br#"{"detail":42}"#),
            DEFAULT_ERROR_MESSAGE
        );
    }
}
