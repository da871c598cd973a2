//! # Modgate Core
//!
//! The domain layer of the moderation service.
//! This crate holds the moderation pipeline and the ports it talks through;
//! it performs no I/O of its own.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, ModerationError};
pub use services::{LimiterFailurePolicy, ModerationService};
