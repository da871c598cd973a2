//! Content classifier implementations.

mod gemini;

pub use gemini::{GeminiClassifier, GeminiConfig};
