//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod classifier;
mod rate_limit;

pub use classifier::{
    Candidate, ClassifierError, Content, ContentClassifier, GenerateContentRequest,
    GenerateContentResponse, Part,
};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
