//! Feedback-survey notifier.
//!
//! Weekly frequency sends every Monday while a new hire is inside the
//! learning-plan window; monthly frequency sends on the first Monday of the
//! month for the first few months after install.

use chrono::{DateTime, Datelike, Utc, Weekday};
use std::sync::Arc;
use tokio::sync::watch;

use onboard_cards::survey_card;
use onboard_core::error::Result;
use onboard_core::traits::{NotificationSink, UserDirectory};
use onboard_core::types::{SurveyFrequency, UserRecord, UserRole};

use crate::tick::{sleep_or_shutdown, Tick};

/// Sends recurring "share feedback" cards to new hires.
pub struct SurveyNotifier {
    directory: Arc<dyn UserDirectory>,
    sink: Arc<dyn NotificationSink>,
    frequency: SurveyFrequency,
    plan_weeks: u32,
    window_months: u32,
    app_base_uri: String,
}

impl SurveyNotifier {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        sink: Arc<dyn NotificationSink>,
        frequency: SurveyFrequency,
        plan_weeks: u32,
        window_months: u32,
        app_base_uri: &str,
    ) -> Self {
        Self {
            directory,
            sink,
            frequency,
            plan_weeks: plan_weeks.max(1),
            window_months: window_months.max(1),
            app_base_uri: app_base_uri.to_string(),
        }
    }

    /// Whether the cadence fires on this date.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.frequency {
            SurveyFrequency::Weekly => now.weekday() == Weekday::Mon,
            // First Monday of the month.
            SurveyFrequency::Monthly => now.weekday() == Weekday::Mon && now.day() <= 7,
        }
    }

    /// Whether a user still receives surveys as of `now`.
    fn in_window(&self, user: &UserRecord, now: DateTime<Utc>) -> bool {
        let elapsed = user.elapsed_days(now);
        if elapsed < 1 {
            return false;
        }
        match self.frequency {
            SurveyFrequency::Weekly => elapsed <= i64::from(self.plan_weeks) * 7,
            SurveyFrequency::Monthly => elapsed <= i64::from(self.window_months) * 30,
        }
    }

    /// One survey dispatch as of `now`. Returns the number of cards sent.
    pub async fn send_survey_notifications(&self, now: DateTime<Utc>) -> Result<usize> {
        let new_hires = self.directory.users_by_role(UserRole::NewHire).await?;
        let card = survey_card(&self.app_base_uri);

        let mut sent = 0usize;
        for user in new_hires.iter().filter(|u| self.in_window(u, now)) {
            match self
                .sink
                .deliver(&card, &user.conversation_id, &user.service_url)
                .await
            {
                Ok(()) => sent += 1,
                Err(e) => {
                    tracing::error!(
                        "⚠️ Survey notification failed for {}: {e}",
                        user.aad_object_id
                    );
                }
            }
        }

        tracing::info!("📝 Survey dispatch: {sent} cards sent");
        Ok(sent)
    }

    /// The daily loop; dispatches only on due days.
    pub async fn run(&self, check_interval_secs: u64, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "⏰ Survey notifier started ({:?} cadence)",
            self.frequency
        );

        loop {
            let now = Utc::now();
            if self.is_due(now) {
                if let Err(e) = self.send_survey_notifications(now).await {
                    tracing::error!("Error during survey dispatch: {e}");
                }
            }

            if sleep_or_shutdown(check_interval_secs, &mut shutdown).await == Tick::Shutdown {
                tracing::info!("⏹ Survey notifier stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{new_hire, RecordingSink, StaticDirectory};
    use chrono::TimeZone;

    fn notifier(
        users: Vec<UserRecord>,
        frequency: SurveyFrequency,
        sink: Arc<RecordingSink>,
    ) -> SurveyNotifier {
        SurveyNotifier::new(
            Arc::new(StaticDirectory { users }),
            sink,
            frequency,
            4,
            3,
            "https://bot.example.com",
        )
    }

    #[test]
    fn test_weekly_due_any_monday() {
        let n = notifier(Vec::new(), SurveyFrequency::Weekly, Arc::new(RecordingSink::default()));
        // 2026-03-30 and 2026-03-23 are Mondays; 2026-03-31 is a Tuesday.
        assert!(n.is_due(Utc.with_ymd_and_hms(2026, 3, 30, 9, 0, 0).unwrap()));
        assert!(n.is_due(Utc.with_ymd_and_hms(2026, 3, 23, 9, 0, 0).unwrap()));
        assert!(!n.is_due(Utc.with_ymd_and_hms(2026, 3, 31, 9, 0, 0).unwrap()));
    }

    #[test]
    fn test_monthly_due_first_monday_only() {
        let n = notifier(Vec::new(), SurveyFrequency::Monthly, Arc::new(RecordingSink::default()));
        // 2026-03-02 is the first Monday of March; 2026-03-09 is the second.
        assert!(n.is_due(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()));
        assert!(!n.is_due(Utc.with_ymd_and_hms(2026, 3, 9, 9, 0, 0).unwrap()));
        assert!(!n.is_due(Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap()));
    }

    #[tokio::test]
    async fn test_weekly_window_is_plan_length() {
        let now = Utc.with_ymd_and_hms(2026, 3, 30, 9, 0, 0).unwrap();
        let users = vec![
            new_hire("in", 10, now),
            new_hire("today", 0, now),
            new_hire("done", 40, now),
        ];
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(users, SurveyFrequency::Weekly, sink.clone());

        assert_eq!(n.send_survey_notifications(now).await.unwrap(), 1);
        assert_eq!(sink.deliveries()[0].0, "conv-in");
    }

    #[tokio::test]
    async fn test_monthly_window_is_three_months() {
        let now = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let users = vec![new_hire("recent", 40, now), new_hire("old", 100, now)];
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(users, SurveyFrequency::Monthly, sink.clone());

        assert_eq!(n.send_survey_notifications(now).await.unwrap(), 1);
        assert_eq!(sink.deliveries()[0].0, "conv-recent");
    }

    #[tokio::test]
    async fn test_failed_delivery_continues() {
        let now = Utc.with_ymd_and_hms(2026, 3, 30, 9, 0, 0).unwrap();
        let users = vec![new_hire("a", 5, now), new_hire("b", 5, now)];
        let sink = Arc::new(RecordingSink::failing(&["conv-a"]));
        let n = notifier(users, SurveyFrequency::Weekly, sink.clone());

        assert_eq!(n.send_survey_notifications(now).await.unwrap(), 1);
        assert_eq!(sink.deliveries()[0].0, "conv-b");
    }
}
