//! Async traits at the service seams.
//!
//! The scheduler only ever talks to these three interfaces; the concrete
//! SQLite/Graph/Bot Framework implementations live in their own crates, and
//! tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CardAttachment, LearningPlanItem, UserRecord, UserRole};

/// Read access to registered users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users with the given role.
    async fn users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>>;

    /// All users who opted in to pair-up meeting matches.
    async fn users_opted_for_pair_up(&self) -> Result<Vec<UserRecord>>;
}

/// Read access to the current learning plan.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the complete learning plan. Loaded fresh per scheduler run.
    async fn learning_plan(&self) -> Result<Vec<LearningPlanItem>>;
}

/// Proactive card delivery to a user's personal conversation.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver a card to the conversation at the given service endpoint.
    async fn deliver(
        &self,
        card: &CardAttachment,
        conversation_id: &str,
        service_url: &str,
    ) -> Result<()>;
}
