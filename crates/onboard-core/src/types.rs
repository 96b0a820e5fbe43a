//! Domain types — users, learning-plan content, and card attachments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content type of an Adaptive Card attachment.
pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";

/// Content type of a Teams list card attachment.
pub const LIST_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.teams.card.list";

/// Role of a tracked user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    NewHire,
    HiringManager,
}

impl UserRole {
    /// Stable integer encoding used by the user store.
    pub fn as_i64(&self) -> i64 {
        match self {
            UserRole::NewHire => 0,
            UserRole::HiringManager => 1,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(UserRole::NewHire),
            1 => Some(UserRole::HiringManager),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::NewHire => write!(f, "new_hire"),
            UserRole::HiringManager => write!(f, "hiring_manager"),
        }
    }
}

/// A user registered with the bot.
///
/// Written by the user store when the bot is installed; read-only for the
/// notifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Azure AD object id — primary key.
    pub aad_object_id: String,
    /// Display name.
    pub name: String,
    /// User principal name (contains `#ext#` for guest accounts).
    pub user_principal_name: String,
    /// Email address.
    pub email: String,
    /// Personal conversation id for proactive messages.
    pub conversation_id: String,
    /// Bot Framework service URL for the user's region.
    pub service_url: String,
    pub role: UserRole,
    /// When the user installed the bot — anchors the onboarding timeline.
    pub bot_installed_on: DateTime<Utc>,
    /// Whether the user opted in to pair-up meeting matches.
    pub opted_in: bool,
    pub profile_image_url: Option<String>,
}

impl UserRecord {
    /// Whole days elapsed since the bot was installed for this user.
    pub fn elapsed_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.bot_installed_on).num_days()
    }
}

/// A link to learning material.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceLink {
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// One row of the learning plan, loaded fresh from the content source each
/// run. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningPlanItem {
    /// Topic, e.g. "Technology".
    pub topic: String,
    /// Task name, e.g. "ReactJS".
    pub task_name: String,
    /// Completion-week label, e.g. "Week 1".
    pub complete_by: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub link: Option<ResourceLink>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A rendered card ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardAttachment {
    pub content_type: String,
    pub content: serde_json::Value,
}

impl CardAttachment {
    pub fn adaptive(content: serde_json::Value) -> Self {
        Self {
            content_type: ADAPTIVE_CARD_CONTENT_TYPE.into(),
            content,
        }
    }

    pub fn list(content: serde_json::Value) -> Self {
        Self {
            content_type: LIST_CARD_CONTENT_TYPE.into(),
            content,
        }
    }
}

/// How often feedback-survey cards go out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyFrequency {
    Weekly,
    Monthly,
}

impl Default for SurveyFrequency {
    fn default() -> Self {
        SurveyFrequency::Weekly
    }
}
