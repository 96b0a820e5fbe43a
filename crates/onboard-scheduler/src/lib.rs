//! # Onboard Scheduler
//!
//! The background notifiers that make the bot proactive. Each notifier owns
//! an unbounded daily loop: wake, check whether today is its day, dispatch,
//! swallow-and-log any failure, sleep until tomorrow. Shutdown is
//! cooperative — a watch signal interrupts the sleep, never an in-flight
//! delivery.
//!
//! ```text
//! LearningPlanNotifier (daily tick, fires on Mondays)
//!   ├── Matcher: bucket new hires by onboarding week (7-day windows)
//!   ├── Renderer: weekly list card per bucket (onboard-cards)
//!   └── Sink: sequential per-user delivery, log-and-continue
//!
//! PairUpNotifier (every N days)
//!   └── shuffle opted-in users → disjoint pairs → card to both members
//!
//! SurveyNotifier (weekly or first-Monday-of-month)
//!   └── feedback card to new hires still inside the survey window
//! ```

pub mod matcher;
pub mod pair_up;
pub mod survey;
pub mod tick;
pub mod weekly;

pub use matcher::{batch_users_by_week, week_index, week_label, WeeklyBatch};
pub use pair_up::PairUpNotifier;
pub use survey::SurveyNotifier;
pub use tick::{sleep_or_shutdown, Tick};
pub use weekly::LearningPlanNotifier;

#[cfg(test)]
pub(crate) mod testutil {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex;

    use onboard_core::error::{OnboardError, Result};
    use onboard_core::traits::{ContentSource, NotificationSink, UserDirectory};
    use onboard_core::types::{CardAttachment, LearningPlanItem, UserRecord, UserRole};

    pub fn new_hire(id: &str, days_ago: i64, now: DateTime<Utc>) -> UserRecord {
        user(id, UserRole::NewHire, days_ago, now, false)
    }

    pub fn user(
        id: &str,
        role: UserRole,
        days_ago: i64,
        now: DateTime<Utc>,
        opted_in: bool,
    ) -> UserRecord {
        UserRecord {
            aad_object_id: id.into(),
            name: format!("User {id}"),
            user_principal_name: format!("{id}@contoso.com"),
            email: format!("{id}@contoso.com"),
            conversation_id: format!("conv-{id}"),
            service_url: "https://smba.trafficmanager.net/amer/".into(),
            role,
            bot_installed_on: now - Duration::days(days_ago),
            opted_in,
            profile_image_url: None,
        }
    }

    pub fn plan_item(topic: &str, week: &str) -> LearningPlanItem {
        LearningPlanItem {
            topic: topic.into(),
            task_name: format!("{topic} basics"),
            complete_by: week.into(),
            notes: String::new(),
            link: None,
            image_url: None,
        }
    }

    /// Fixed user directory.
    pub struct StaticDirectory {
        pub users: Vec<UserRecord>,
    }

    #[async_trait]
    impl UserDirectory for StaticDirectory {
        async fn users_by_role(&self, role: UserRole) -> Result<Vec<UserRecord>> {
            Ok(self.users.iter().filter(|u| u.role == role).cloned().collect())
        }

        async fn users_opted_for_pair_up(&self) -> Result<Vec<UserRecord>> {
            Ok(self.users.iter().filter(|u| u.opted_in).cloned().collect())
        }
    }

    /// Fixed learning plan.
    pub struct StaticContent {
        pub items: Vec<LearningPlanItem>,
    }

    #[async_trait]
    impl ContentSource for StaticContent {
        async fn learning_plan(&self) -> Result<Vec<LearningPlanItem>> {
            Ok(self.items.clone())
        }
    }

    /// Records every delivery; conversations in `fail` error out instead.
    #[derive(Default)]
    pub struct RecordingSink {
        pub sent: Mutex<Vec<(String, CardAttachment)>>,
        pub fail: HashSet<String>,
    }

    impl RecordingSink {
        pub fn failing(conversations: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: conversations.iter().map(|s| s.to_string()).collect(),
            }
        }

        pub fn deliveries(&self) -> Vec<(String, CardAttachment)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(
            &self,
            card: &CardAttachment,
            conversation_id: &str,
            _service_url: &str,
        ) -> Result<()> {
            if self.fail.contains(conversation_id) {
                return Err(OnboardError::Channel(format!(
                    "synthetic failure for {conversation_id}"
                )));
            }
            self.sent
                .lock()
                .unwrap()
                .push((conversation_id.to_string(), card.clone()));
            Ok(())
        }
    }
}
