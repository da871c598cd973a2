//! Content classifier port.
//!
//! Request and response shapes follow the `generateContent` call of
//! generative-AI providers: a list of role-tagged contents in, a list of
//! candidates out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Generative model used to judge content.
#[async_trait]
pub trait ContentClassifier: Send + Sync {
    /// Run a single generation request. Implementations must not retry.
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ClassifierError>;
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateContentRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub system_instruction: Option<Content>,
    pub response_mime_type: Option<String>,
}

/// A role-tagged sequence of parts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    /// Role-less content, as used for system instructions.
    pub fn instruction(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Generation output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Build a response holding one candidate with one text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part::text(text)],
                }),
            }],
        }
    }

    /// Text of the first part of the first candidate, if non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.is_empty())
    }
}

/// Classifier call failures.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Undecodable provider response: {0}")]
    Decode(String),
}
