//! The moderation pipeline: admission control, validation, classification.

use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::{ModerationRequest, ModerationVerdict};
use crate::error::{DomainError, ModerationError};
use crate::ports::{Content, ContentClassifier, GenerateContentRequest, RateLimiter};

/// Instruction sent alongside every piece of user content.
pub const SYSTEM_INSTRUCTION: &str =
    "Evaluate safety and respond in JSON format. Provide a 'safe' boolean and 'reason' string.";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

pub const JSON_MIME_TYPE: &str = "application/json";

/// What to do when the rate limiter itself cannot answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimiterFailurePolicy {
    /// Reject the request as a server failure.
    #[default]
    FailClosed,
    /// Log the failure and admit the request.
    FailOpen,
}

impl FromStr for LimiterFailurePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "closed" | "fail-closed" | "fail_closed" => Ok(Self::FailClosed),
            "open" | "fail-open" | "fail_open" => Ok(Self::FailOpen),
            other => Err(DomainError::Validation(format!(
                "unknown limiter failure policy '{}', expected 'open' or 'closed'",
                other
            ))),
        }
    }
}

/// Moderation pipeline over injected collaborators.
///
/// Holds only shared, read-only handles, so one instance serves every
/// concurrent request.
pub struct ModerationService {
    limiter: Arc<dyn RateLimiter>,
    classifier: Arc<dyn ContentClassifier>,
    model: String,
    on_limiter_failure: LimiterFailurePolicy,
}

impl ModerationService {
    pub fn new(limiter: Arc<dyn RateLimiter>, classifier: Arc<dyn ContentClassifier>) -> Self {
        Self {
            limiter,
            classifier,
            model: DEFAULT_MODEL.to_string(),
            on_limiter_failure: LimiterFailurePolicy::default(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_limiter_failure_policy(mut self, policy: LimiterFailurePolicy) -> Self {
        self.on_limiter_failure = policy;
        self
    }

    /// Limiter key for a client address.
    pub fn rate_limit_key(client_ip: &str) -> String {
        format!("ratelimit_{}", client_ip)
    }

    /// Run the full pipeline for one request.
    ///
    /// Admission control runs first, so rejected payloads still consume a
    /// permit. The classifier is only reached by admitted, valid requests.
    pub async fn moderate(
        &self,
        client_ip: &str,
        body: Option<&Value>,
    ) -> Result<ModerationVerdict, ModerationError> {
        self.admit(client_ip).await?;

        let request =
            ModerationRequest::from_body(body).map_err(ModerationError::InvalidContent)?;

        self.classify(&request).await
    }

    async fn admit(&self, client_ip: &str) -> Result<(), ModerationError> {
        let key = Self::rate_limit_key(client_ip);

        match self.limiter.check(&key).await {
            Ok(result) if result.allowed => Ok(()),
            Ok(result) => {
                tracing::debug!(%key, reset_at = %result.reset_at, "Rate limit exceeded");
                Err(ModerationError::RateLimited {
                    reset_at: result.reset_at,
                })
            }
            Err(e) => match self.on_limiter_failure {
                LimiterFailurePolicy::FailOpen => {
                    tracing::warn!(error = %e, %key, "Rate limiter error, failing open");
                    Ok(())
                }
                LimiterFailurePolicy::FailClosed => Err(e.into()),
            },
        }
    }

    /// Ask the classifier for a verdict on already-validated content.
    pub async fn classify(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationVerdict, ModerationError> {
        let response = self
            .classifier
            .generate_content(self.build_request(request))
            .await?;

        let text = response.first_text().ok_or(ModerationError::EmptyOutput)?;

        ModerationVerdict::parse(text).map_err(ModerationError::MalformedOutput)
    }

    fn build_request(&self, request: &ModerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            model: self.model.clone(),
            contents: vec![Content::user(request.user_content.clone())],
            system_instruction: Some(Content::instruction(SYSTEM_INSTRUCTION)),
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
        }
    }
}
