//! Microsoft Graph app-only authentication.
//!
//! Client-credentials flow against the tenant's v2.0 token endpoint. Tokens
//! are cached and refreshed five minutes before they expire.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Mutex;

use onboard_core::error::{OnboardError, Result};

/// Refresh this long before the token actually expires.
const EXPIRY_SLACK_SECS: i64 = 300;

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Client-credentials token client for Microsoft Graph.
pub struct GraphTokenClient {
    client: reqwest::Client,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl GraphTokenClient {
    pub fn new(tenant_id: &str, client_id: &str, client_secret: &str) -> Self {
        Self::with_scope(
            tenant_id,
            client_id,
            client_secret,
            "https://graph.microsoft.com/.default",
        )
    }

    pub fn with_scope(
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
        scope: &str,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: scope.to_string(),
            cached: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            self.tenant_id
        )
    }

    /// Get a valid access token, fetching a fresh one if the cache is stale.
    pub async fn token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let response = self
            .client
            .post(self.token_url())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| OnboardError::Content(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OnboardError::Content(format!(
                "Token endpoint error {status}: {body}"
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| OnboardError::Content(format!("Invalid token response: {e}")))?;

        let expires_at =
            Utc::now() + Duration::seconds((body.expires_in - EXPIRY_SLACK_SECS).max(0));
        let mut cached = self.cached.lock().unwrap();
        *cached = Some(CachedToken {
            access_token: body.access_token.clone(),
            expires_at,
        });
        tracing::debug!("🔑 Refreshed Graph token (valid until {expires_at})");

        Ok(body.access_token)
    }

    fn cached_token(&self) -> Option<String> {
        let cached = self.cached.lock().unwrap();
        cached
            .as_ref()
            .filter(|t| t.expires_at > Utc::now())
            .map(|t| t.access_token.clone())
    }

    /// Drop the cached token (e.g. after a 401 from Graph).
    pub fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap();
        *cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GraphTokenClient {
        GraphTokenClient::new("tenant-1", "client-1", "secret-1")
    }

    #[test]
    fn test_token_url_embeds_tenant() {
        assert_eq!(
            client().token_url(),
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_cache_honors_expiry() {
        let c = client();
        assert!(c.cached_token().is_none());

        {
            let mut cached = c.cached.lock().unwrap();
            *cached = Some(CachedToken {
                access_token: "tok".into(),
                expires_at: Utc::now() + Duration::seconds(60),
            });
        }
        assert_eq!(c.cached_token().as_deref(), Some("tok"));

        {
            let mut cached = c.cached.lock().unwrap();
            *cached = Some(CachedToken {
                access_token: "tok".into(),
                expires_at: Utc::now() - Duration::seconds(1),
            });
        }
        assert!(c.cached_token().is_none());

        c.invalidate();
        assert!(c.cached.lock().unwrap().is_none());
    }
}
