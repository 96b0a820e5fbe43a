//! Week-bucket matcher.
//!
//! Each new hire's onboarding timeline is partitioned into 7-day windows
//! anchored at the bot install time. Week `i` covers elapsed days in the
//! half-open interval `(7*(i-1), 7*i]`: day 0 belongs to no week yet, day 7
//! closes week 1, and anything past `7 * plan_weeks` is done with the plan.

use chrono::{DateTime, Utc};

use onboard_core::types::UserRecord;

/// Week index (1-based) for a user with the given elapsed whole days, or
/// `None` when the user is outside every window.
pub fn week_index(elapsed_days: i64, plan_weeks: u32) -> Option<u32> {
    if elapsed_days <= 0 || elapsed_days > i64::from(plan_weeks) * 7 {
        return None;
    }
    // Ceiling division puts day 7k in week k, day 7k+1 in week k+1.
    Some(((elapsed_days + 6) / 7) as u32)
}

/// Display label for a week index.
pub fn week_label(week: u32) -> String {
    format!("Week {week}")
}

/// Users due for one week's content.
#[derive(Debug, Clone)]
pub struct WeeklyBatch {
    pub week: u32,
    pub users: Vec<UserRecord>,
}

/// Bucket users by onboarding week as of `now`. Only non-empty buckets are
/// returned, in week order.
pub fn batch_users_by_week(
    users: &[UserRecord],
    now: DateTime<Utc>,
    plan_weeks: u32,
) -> Vec<WeeklyBatch> {
    let mut batches: Vec<WeeklyBatch> = (1..=plan_weeks)
        .map(|week| WeeklyBatch {
            week,
            users: Vec::new(),
        })
        .collect();

    for user in users {
        if let Some(week) = week_index(user.elapsed_days(now), plan_weeks) {
            batches[(week - 1) as usize].users.push(user.clone());
        }
    }

    batches.retain(|b| !b.users.is_empty());
    batches
}
