//! Domain entities - the values that flow through one moderation request.

mod request;
mod verdict;

pub use request::{MAX_CONTENT_LENGTH, ModerationRequest};
pub use verdict::ModerationVerdict;
