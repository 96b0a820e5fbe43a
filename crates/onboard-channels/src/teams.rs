//! Microsoft Teams channel — proactive card delivery via Bot Framework.
//!
//! Authenticates with the bot app registration against the Bot Framework
//! tenant, then posts activities straight to the user's regional service URL.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Mutex;

use onboard_core::error::{OnboardError, Result};
use onboard_core::traits::NotificationSink;
use onboard_core::types::CardAttachment;

/// Bot Framework token endpoint (fixed tenant for all bots).
const TOKEN_URL: &str = "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";

/// Scope for the connector API.
const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

/// Refresh this long before the token actually expires.
const EXPIRY_SLACK_SECS: i64 = 300;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Teams delivery channel.
pub struct TeamsChannel {
    client: reqwest::Client,
    app_id: String,
    app_password: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TeamsChannel {
    pub fn new(app_id: &str, app_password: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_id: app_id.to_string(),
            app_password: app_password.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Get a connector token, fetching a fresh one if the cache is stale.
    async fn token(&self) -> Result<String> {
        {
            let cached = self.cached.lock().unwrap();
            if let Some(token) = cached.as_ref().filter(|t| t.expires_at > Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.app_id.as_str()),
                ("client_secret", self.app_password.as_str()),
                ("scope", TOKEN_SCOPE),
            ])
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| OnboardError::Channel(format!("Bot token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OnboardError::Channel(format!(
                "Bot token endpoint error {status}: {body}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| OnboardError::Channel(format!("Invalid bot token response: {e}")))?;

        let expires_at =
            Utc::now() + Duration::seconds((body.expires_in - EXPIRY_SLACK_SECS).max(0));
        let mut cached = self.cached.lock().unwrap();
        *cached = Some(CachedToken {
            access_token: body.access_token.clone(),
            expires_at,
        });

        Ok(body.access_token)
    }

    fn activities_url(service_url: &str, conversation_id: &str) -> String {
        format!(
            "{}/v3/conversations/{}/activities",
            service_url.trim_end_matches('/'),
            conversation_id
        )
    }

    fn activity_payload(&self, card: &CardAttachment, conversation_id: &str) -> Value {
        json!({
            "type": "message",
            "from": { "id": format!("28:{}", self.app_id) },
            "conversation": { "id": conversation_id },
            "attachments": [{
                "contentType": card.content_type,
                "content": card.content,
            }],
        })
    }
}

#[async_trait]
impl NotificationSink for TeamsChannel {
    async fn deliver(
        &self,
        card: &CardAttachment,
        conversation_id: &str,
        service_url: &str,
    ) -> Result<()> {
        let token = self.token().await?;
        let url = Self::activities_url(service_url, conversation_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&self.activity_payload(card, conversation_id))
            .timeout(std::time::Duration::from_secs(15))
            .send()
            .await
            .map_err(|e| OnboardError::Channel(format!("Send activity failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("✅ Card delivered to conversation {conversation_id}");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status.as_u16(), &body))
    }
}

/// Map a connector HTTP failure onto the error taxonomy. Throttling and
/// server-side failures are transient; everything else is terminal.
pub fn classify_status(status: u16, body: &str) -> OnboardError {
    if status == 429 || (500..600).contains(&status) {
        OnboardError::Transient {
            status,
            message: body.to_string(),
        }
    } else {
        OnboardError::Channel(format!("Connector error {status}: {body}"))
    }
}
