//! Retry decorator for notification sinks.
//!
//! Wraps any [`NotificationSink`] and re-attempts deliveries that failed
//! with a transient error (throttling, server-side 5xx). Uses decorrelated
//! jitter: each delay is drawn uniformly from [base, 3 * previous], so
//! concurrent clients spread out instead of retrying in lockstep.

use async_trait::async_trait;
use rand::Rng;

use onboard_core::error::Result;
use onboard_core::traits::NotificationSink;
use onboard_core::types::CardAttachment;

/// Retry tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries in addition to the original attempt.
    pub max_retries: u32,
    /// Lower bound for every delay.
    pub base_delay_ms: u64,
    /// Upper bound any delay is clamped to.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1_000,
            max_delay_ms: 8_000,
        }
    }
}

/// A sink wrapped with bounded retry.
pub struct Retry<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S> Retry<S> {
    pub fn new(inner: S) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    pub fn with_policy(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: NotificationSink> NotificationSink for Retry<S> {
    async fn deliver(
        &self,
        card: &CardAttachment,
        conversation_id: &str,
        service_url: &str,
    ) -> Result<()> {
        let mut attempt: u32 = 0;
        let mut prev_delay_ms = self.policy.base_delay_ms;

        loop {
            match self.inner.deliver(card, conversation_id, service_url).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay_ms = next_delay_ms(
                        self.policy.base_delay_ms,
                        prev_delay_ms,
                        self.policy.max_delay_ms,
                    );
                    prev_delay_ms = delay_ms;
                    tracing::warn!(
                        "⏳ Transient delivery failure for {conversation_id} ({e}); retry {attempt}/{} in {delay_ms}ms",
                        self.policy.max_retries
                    );
                    tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Decorrelated jitter: uniform in [base, 3 * previous], clamped to the cap.
fn next_delay_ms(base_ms: u64, prev_ms: u64, cap_ms: u64) -> u64 {
    let upper = prev_ms.saturating_mul(3).clamp(base_ms + 1, cap_ms.max(base_ms + 1));
    rand::thread_rng().gen_range(base_ms..=upper)
}
