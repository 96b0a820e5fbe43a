//! Pair-up notifier.
//!
//! Every matching round shuffles the opted-in users and walks the result
//! two at a time, so pairs are disjoint and change between rounds. Both
//! members of a pair get a card naming the other; an odd user out simply
//! waits for the next round.

use rand::seq::SliceRandom;
use std::sync::Arc;
use tokio::sync::watch;

use onboard_cards::pair_up_card;
use onboard_core::error::Result;
use onboard_core::traits::{NotificationSink, UserDirectory};

use crate::tick::{sleep_or_shutdown, Tick};

/// Suggests get-to-know-you meetups between opted-in users.
pub struct PairUpNotifier {
    directory: Arc<dyn UserDirectory>,
    sink: Arc<dyn NotificationSink>,
    interval_days: u32,
}

impl PairUpNotifier {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        sink: Arc<dyn NotificationSink>,
        interval_days: u32,
    ) -> Self {
        Self {
            directory,
            sink,
            interval_days: interval_days.max(1),
        }
    }

    /// One matching round. Returns the number of pairs formed.
    pub async fn send_pair_up_notifications(&self) -> Result<usize> {
        let mut users = self.directory.users_opted_for_pair_up().await?;
        if users.len() < 2 {
            tracing::debug!("Not enough opted-in users to pair up ({})", users.len());
            return Ok(0);
        }

        users.shuffle(&mut rand::thread_rng());
        if users.len() % 2 == 1 {
            tracing::debug!(
                "Odd user out this round: {}",
                users.last().map(|u| u.aad_object_id.as_str()).unwrap_or("?")
            );
        }

        let mut pairs = 0usize;
        for pair in users.chunks_exact(2) {
            for (member, peer) in [(&pair[0], &pair[1]), (&pair[1], &pair[0])] {
                let card = pair_up_card(member, peer);
                if let Err(e) = self
                    .sink
                    .deliver(&card, &member.conversation_id, &member.service_url)
                    .await
                {
                    tracing::error!(
                        "⚠️ Pair-up notification failed for {}: {e}",
                        member.aad_object_id
                    );
                }
            }
            pairs += 1;
        }

        tracing::info!("🤝 Pair-up round complete: {pairs} pairs matched");
        Ok(pairs)
    }

    /// The matching loop; one round every `interval_days`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "⏰ Pair-up notifier started (round every {} days)",
            self.interval_days
        );

        loop {
            if let Err(e) = self.send_pair_up_notifications().await {
                tracing::error!("Error during pair-up round: {e}");
            }

            let secs = u64::from(self.interval_days) * 86_400;
            if sleep_or_shutdown(secs, &mut shutdown).await == Tick::Shutdown {
                tracing::info!("⏹ Pair-up notifier stopped");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{user, RecordingSink, StaticDirectory};
    use chrono::Utc;
    use onboard_core::types::UserRole;
    use std::collections::HashSet;

    fn notifier(users: Vec<onboard_core::types::UserRecord>, sink: Arc<RecordingSink>) -> PairUpNotifier {
        PairUpNotifier::new(Arc::new(StaticDirectory { users }), sink, 14)
    }

    fn opted(id: &str) -> onboard_core::types::UserRecord {
        user(id, UserRole::NewHire, 5, Utc::now(), true)
    }

    #[tokio::test]
    async fn test_four_users_two_pairs() {
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(vec![opted("a"), opted("b"), opted("c"), opted("d")], sink.clone());

        let pairs = n.send_pair_up_notifications().await.unwrap();
        assert_eq!(pairs, 2);

        // Both members of each pair got exactly one card.
        let deliveries = sink.deliveries();
        assert_eq!(deliveries.len(), 4);
        let conversations: HashSet<&str> =
            deliveries.iter().map(|(conv, _)| conv.as_str()).collect();
        assert_eq!(conversations.len(), 4);
    }

    #[tokio::test]
    async fn test_odd_user_out_is_skipped() {
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(vec![opted("a"), opted("b"), opted("c")], sink.clone());

        let pairs = n.send_pair_up_notifications().await.unwrap();
        assert_eq!(pairs, 1);
        assert_eq!(sink.deliveries().len(), 2);
    }

    #[tokio::test]
    async fn test_too_few_users_no_round() {
        let sink = Arc::new(RecordingSink::default());
        let n = notifier(vec![opted("a")], sink.clone());

        assert_eq!(n.send_pair_up_notifications().await.unwrap(), 0);
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_only_opted_in_users_are_matched() {
        let now = Utc::now();
        let sink = Arc::new(RecordingSink::default());
        let users = vec![
            opted("a"),
            opted("b"),
            user("paused", UserRole::NewHire, 5, now, false),
        ];
        let n = notifier(users, sink.clone());

        assert_eq!(n.send_pair_up_notifications().await.unwrap(), 1);
        let deliveries = sink.deliveries();
        assert!(deliveries.iter().all(|(conv, _)| conv != "conv-paused"));
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_stop_round() {
        let sink = Arc::new(RecordingSink::failing(&["conv-a"]));
        let n = notifier(vec![opted("a"), opted("b"), opted("c"), opted("d")], sink.clone());

        let pairs = n.send_pair_up_notifications().await.unwrap();
        assert_eq!(pairs, 2);
        assert_eq!(sink.deliveries().len(), 3);
    }
}
