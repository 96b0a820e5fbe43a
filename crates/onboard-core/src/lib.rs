//! # Onboard Core
//!
//! Shared foundation for the Onboardbot workspace: the error type, TOML
//! configuration, domain types, and the async traits that seam the service
//! together (user directory, content source, notification sink).
//!
//! Everything here is deliberately dependency-light so every other crate can
//! build on it without pulling in HTTP or database stacks.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::OnboardConfig;
pub use error::{OnboardError, Result};
pub use traits::{ContentSource, NotificationSink, UserDirectory};
pub use types::{CardAttachment, LearningPlanItem, SurveyFrequency, UserRecord, UserRole};
