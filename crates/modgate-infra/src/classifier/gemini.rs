//! Google Gemini `generateContent` client.
//!
//! API docs: https://ai.google.dev/api/generate-content

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use modgate_core::ports::{
    ClassifierError, Content, ContentClassifier, GenerateContentRequest, GenerateContentResponse,
};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// Whole-request timeout; the provider call is never retried.
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Build from `GEMINI_API_KEY`, `GEMINI_BASE_URL` and `GEMINI_TIMEOUT_SECS`.
    ///
    /// Returns `None` when the API key is not set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(secs) = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout = Duration::from_secs(secs);
        }
        Some(config)
    }
}

/// Classifier backed by the Gemini REST API.
pub struct GeminiClassifier {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClassifier {
    pub fn new(config: GeminiConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl ContentClassifier for GeminiClassifier {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClassifierError> {
        let url = self.endpoint(&request.model);
        let body = GeminiRequest::from(&request);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifierError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))?;

        tracing::debug!(
            model = %request.model,
            candidates = result.candidates.len(),
            "Classifier responded"
        );

        Ok(result)
    }
}

// --- Gemini request wire types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<&'a Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

impl<'a> From<&'a GenerateContentRequest> for GeminiRequest<'a> {
    fn from(request: &'a GenerateContentRequest) -> Self {
        Self {
            contents: &request.contents,
            system_instruction: request.system_instruction.as_ref(),
            generation_config: request
                .response_mime_type
                .as_deref()
                .map(|mime| GenerationConfig {
                    response_mime_type: mime,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn moderation_request() -> GenerateContentRequest {
        GenerateContentRequest {
            model: "gemini-1.5-flash".to_string(),
            contents: vec![Content::user("hello")],
            system_instruction: Some(Content::instruction("Evaluate safety.")),
            response_mime_type: Some("application/json".to_string()),
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = moderation_request();
        let body = serde_json::to_value(GeminiRequest::from(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "systemInstruction": { "parts": [{ "text": "Evaluate safety." }] },
                "generationConfig": { "responseMimeType": "application/json" }
            })
        );
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let request = GenerateContentRequest {
            system_instruction: None,
            response_mime_type: None,
            ..moderation_request()
        };
        let body = serde_json::to_value(GeminiRequest::from(&request)).unwrap();

        assert!(body.get("systemInstruction").is_none());
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_decoding() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "{\"safe\": true, \"reason\": \"ok\"}" }]
                },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 12 }
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(response.first_text(), Some("{\"safe\": true, \"reason\": \"ok\"}"));
    }

    #[test]
    fn test_blocked_prompt_has_no_text() {
        let raw = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_endpoint() {
        let mut config = GeminiConfig::new("key");
        config.base_url = "http://localhost:9999/v1beta/".to_string();
        let classifier = GeminiClassifier::new(config).unwrap();

        assert_eq!(
            classifier.endpoint("gemini-1.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
