use serde_json::Value;

use crate::error::DomainError;

/// Longest `userContent` accepted, in UTF-16 code units.
pub const MAX_CONTENT_LENGTH: usize = 1200;

/// Validated moderation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationRequest {
    pub user_content: String,
}

impl ModerationRequest {
    /// Extract and validate `userContent` from a parsed request body.
    ///
    /// The content must be a non-empty JSON string of at most
    /// [`MAX_CONTENT_LENGTH`] UTF-16 code units, the unit browsers and
    /// JavaScript clients use for string length. Characters outside the
    /// Basic Multilingual Plane count twice. The text is taken exactly as
    /// sent: no trimming and no normalization.
    pub fn from_body(body: Option<&Value>) -> Result<Self, DomainError> {
        let content = body
            .and_then(|b| b.get("userContent"))
            .ok_or_else(|| DomainError::Validation("userContent is missing".to_string()))?;

        let text = content
            .as_str()
            .ok_or_else(|| DomainError::Validation("userContent must be a string".to_string()))?;

        if text.is_empty() {
            return Err(DomainError::Validation("userContent is empty".to_string()));
        }

        let length = text.encode_utf16().count();
        if length > MAX_CONTENT_LENGTH {
            return Err(DomainError::Validation(format!(
                "userContent has {} UTF-16 code units, limit is {}",
                length, MAX_CONTENT_LENGTH
            )));
        }

        Ok(Self {
            user_content: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_plain_content() {
        let body = json!({ "userContent": "hello" });
        let req = ModerationRequest::from_body(Some(&body)).unwrap();
        assert_eq!(req.user_content, "hello");
    }

    #[test]
    fn test_length_boundary() {
        let at_limit = json!({ "userContent": "a".repeat(MAX_CONTENT_LENGTH) });
        assert!(ModerationRequest::from_body(Some(&at_limit)).is_ok());

        let over_limit = json!({ "userContent": "a".repeat(MAX_CONTENT_LENGTH + 1) });
        assert!(ModerationRequest::from_body(Some(&over_limit)).is_err());
    }

    #[test]
    fn test_counts_utf16_code_units() {
        // 1200 two-byte characters is 2400 bytes but 1200 code units.
        let body = json!({ "userContent": "é".repeat(MAX_CONTENT_LENGTH) });
        assert!(ModerationRequest::from_body(Some(&body)).is_ok());

        // Each emoji is a surrogate pair.
        let half = MAX_CONTENT_LENGTH / 2;
        let at_limit = json!({ "userContent": "😀".repeat(half) });
        assert!(ModerationRequest::from_body(Some(&at_limit)).is_ok());

        let over_limit = json!({ "userContent": "😀".repeat(half + 1) });
        assert!(ModerationRequest::from_body(Some(&over_limit)).is_err());

        let full_chars = json!({ "userContent": "😀".repeat(MAX_CONTENT_LENGTH) });
        assert!(ModerationRequest::from_body(Some(&full_chars)).is_err());
    }

    #[test]
    fn test_keeps_whitespace() {
        let body = json!({ "userContent": "  padded \n" });
        let req = ModerationRequest::from_body(Some(&body)).unwrap();
        assert_eq!(req.user_content, "  padded \n");
    }

    #[test]
    fn test_rejects_missing_and_non_string() {
        assert!(ModerationRequest::from_body(None).is_err());
        assert!(ModerationRequest::from_body(Some(&json!({}))).is_err());
        assert!(ModerationRequest::from_body(Some(&json!("hello"))).is_err());
        assert!(ModerationRequest::from_body(Some(&json!({ "userContent": 42 }))).is_err());
        assert!(ModerationRequest::from_body(Some(&json!({ "userContent": null }))).is_err());
        assert!(ModerationRequest::from_body(Some(&json!({ "userContent": ["hi"] }))).is_err());
    }

    #[test]
    fn test_rejects_empty_string() {
        let body = json!({ "userContent": "" });
        assert!(ModerationRequest::from_body(Some(&body)).is_err());
    }
}
