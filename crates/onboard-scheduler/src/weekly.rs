//! Weekly learning-plan notifier.
//!
//! Daily loop; fires on Mondays (UTC). One run loads the full plan, buckets
//! the new hires by onboarding week, renders one list card per week, and
//! delivers it to each user in that bucket, sequentially.

use chrono::{DateTime, Datelike, Utc, Weekday};
use std::sync::Arc;
use tokio::sync::watch;

use onboard_cards::learning_plan_list_card;
use onboard_core::error::Result;
use onboard_core::traits::{ContentSource, NotificationSink, UserDirectory};
use onboard_core::types::UserRole;

use crate::matcher::{batch_users_by_week, week_label};
use crate::tick::{sleep_or_shutdown, Tick};

/// Sends each new hire the learning content for the week they are in.
pub struct LearningPlanNotifier {
    directory: Arc<dyn UserDirectory>,
    content: Arc<dyn ContentSource>,
    sink: Arc<dyn NotificationSink>,
    plan_weeks: u32,
    app_base_uri: String,
}

impl LearningPlanNotifier {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        content: Arc<dyn ContentSource>,
        sink: Arc<dyn NotificationSink>,
        plan_weeks: u32,
        app_base_uri: &str,
    ) -> Self {
        Self {
            directory,
            content,
            sink,
            plan_weeks: plan_weeks.max(1),
            app_base_uri: app_base_uri.to_string(),
        }
    }

    /// One weekly dispatch as of `now`.
    ///
    /// Returns `Ok(false)` when no learning plan is available at all — the
    /// sink is never contacted in that case. Per-user delivery failures are
    /// logged and do not abort the rest of the batch.
    pub async fn send_weekly_notifications(&self, now: DateTime<Utc>) -> Result<bool> {
        let new_hires = self.directory.users_by_role(UserRole::NewHire).await?;
        let plan = self.content.learning_plan().await?;

        if plan.is_empty() {
            tracing::error!("Learning plan not available.");
            return Ok(false);
        }

        let mut sent = 0usize;
        let mut failed = 0usize;

        for batch in batch_users_by_week(&new_hires, now, self.plan_weeks) {
            let label = week_label(batch.week);
            let card = learning_plan_list_card(&plan, &label, &self.app_base_uri);

            for user in &batch.users {
                match self
                    .sink
                    .deliver(&card, &user.conversation_id, &user.service_url)
                    .await
                {
                    Ok(()) => sent += 1,
                    Err(e) => {
                        failed += 1;
                        tracing::error!(
                            "⚠️ {} notification failed for {}: {e}",
                            label,
                            user.aad_object_id
                        );
                    }
                }
            }
        }

        tracing::info!("📣 Weekly learning plan dispatch: {sent} sent, {failed} failed");
        Ok(true)
    }

    /// The daily loop. Survives failed runs; stops only on the shutdown
    /// signal.
    pub async fn run(&self, check_interval_secs: u64, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "⏰ Learning plan notifier started (check every {check_interval_secs}s)"
        );

        loop {
            let now = Utc::now();
            if now.weekday() == Weekday::Mon {
                match self.send_weekly_notifications(now).await {
                    Ok(true) => {
                        tracing::info!("Monday of the week: {now} — learning plan notifications sent");
                    }
                    Ok(false) => {
                        tracing::warn!("Weekly dispatch skipped: no learning plan content");
                    }
                    Err(e) => {
                        tracing::error!("Error during weekly learning plan dispatch: {e}");
                    }
                }
            }

            if sleep_or_shutdown(check_interval_secs, &mut shutdown).await == Tick::Shutdown {
                tracing::info!("⏹ Learning plan notifier stopped");
                break;
            }
        }
    }
}
