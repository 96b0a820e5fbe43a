//! # Onboard Channels
//!
//! Outbound delivery to Microsoft Teams via the Bot Framework connector
//! REST API, plus the retry decorator that wraps any [`NotificationSink`]
//! with bounded, jittered backoff.
//!
//! ```text
//! Retry<TeamsChannel>.deliver(card, conversation_id, service_url)
//!   ├── Bot Framework OAuth token (client credentials, cached)
//!   └── POST {service_url}/v3/conversations/{id}/activities
//!         429/5xx → retried (decorrelated jitter, max 2 retries)
//!         anything else → propagated
//! ```
//!
//! [`NotificationSink`]: onboard_core::traits::NotificationSink

pub mod retry;
pub mod teams;

pub use retry::{Retry, RetryPolicy};
pub use teams::TeamsChannel;
