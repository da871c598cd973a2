//! Application services - orchestration over domain types and ports.

mod moderation;

pub use moderation::{
    DEFAULT_MODEL, JSON_MIME_TYPE, LimiterFailurePolicy, ModerationService, SYSTEM_INSTRUCTION,
};
