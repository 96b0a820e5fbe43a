//! Error type shared across the Onboardbot workspace.

use thiserror::Error;

/// Workspace-wide error type.
#[derive(Debug, Error)]
pub enum OnboardError {
    /// Configuration load/parse/save failures.
    #[error("Config error: {0}")]
    Config(String),

    /// User store failures (SQLite).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Learning-plan content source failures (Graph/SharePoint).
    #[error("Content error: {0}")]
    Content(String),

    /// Message delivery failures that are not worth retrying.
    #[error("Channel error: {0}")]
    Channel(String),

    /// Throttling or transient server failure from a delivery endpoint.
    /// The retry layer keys off this variant; everything else propagates.
    #[error("Transient channel failure (HTTP {status}): {message}")]
    Transient { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OnboardError {
    /// Whether a failed delivery may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, OnboardError::Transient { .. })
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let throttled = OnboardError::Transient {
            status: 429,
            message: "rate limited".into(),
        };
        assert!(throttled.is_transient());
        assert!(!OnboardError::Channel("bad conversation id".into()).is_transient());
    }
}
