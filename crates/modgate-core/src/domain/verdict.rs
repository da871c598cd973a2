use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;

/// Safety judgment produced by the classifier.
///
/// Fields beyond `safe` and `reason` are kept and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub safe: bool,
    pub reason: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModerationVerdict {
    /// Parse the classifier's raw JSON text. No repair is attempted.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        serde_json::from_str(text).map_err(|e| DomainError::MalformedVerdict(e.to_string()))
    }
}
