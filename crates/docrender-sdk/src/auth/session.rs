//! Session token lifecycle
//!
//! `AuthSession` owns the bearer token for one client instance. It logs in
//! with Basic credentials on first use and renews the token whenever it is
//! within the renewal margin of expiry.

use super::types::{AuthToken, Credentials};
use crate::client::join_url;
use crate::error::{ApiError, Result};
use chrono::Utc;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Token slot guarded by the session mutex
struct TokenCache {
    token: Option<AuthToken>,
}

impl TokenCache {
    fn new() -> Self {
        Self { token: None }
    }

    fn get(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    fn set(&mut self, token: AuthToken) {
        self.token = Some(token);
    }

    fn clear(&mut self) {
        self.token = None;
    }

    fn take(&mut self) -> Option<AuthToken> {
        self.token.take()
    }
}

/// Owns the access token and renews it before protected calls
pub struct AuthSession {
    http_client: reqwest::Client,
    credentials: Credentials,
    renewal_margin: Duration,
    // Held across renewal so two callers never log in at the same time
    cache: Mutex<TokenCache>,
}

impl AuthSession {
    pub fn new(
        http_client: reqwest::Client,
        credentials: Credentials,
        renewal_margin: Duration,
    ) -> Self {
        Self {
            http_client,
            credentials,
            renewal_margin,
            cache: Mutex::new(TokenCache::new()),
        }
    }

    /// Return a usable access token, logging in again if needed
    pub async fn ensure(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.get() {
            if !token.needs_renewal(self.renewal_margin, Utc::now()) {
                debug!("Using cached token");
                return Ok(token.access_token.clone());
            }
            debug!("Token expired or expiring soon, renewing");
        }

        // A failed login must not leave the stale token behind
        cache.clear();

        let token = self.login().await?;
        let access_token = token.access_token.clone();
        info!(
            "Authenticated {} (token valid until {})",
            self.credentials.username, token.access_token_expires_at
        );
        cache.set(token);

        Ok(access_token)
    }

    /// Best-effort logout. Never fails the caller; returns false when the
    /// revoke request was rejected.
    ///
    /// The revoke request is only sent when the access token has already
    /// expired. A token that is still valid is simply dropped.
    pub async fn release(&self) -> bool {
        let Some(token) = self.cache.lock().await.take() else {
            debug!("No session to release");
            return true;
        };

        if !token.is_access_expired(Utc::now()) {
            debug!("Access token still valid, skipping revoke");
            return true;
        }

        let url = join_url(&self.credentials.base_url, "authenticate");
        let response = self
            .http_client
            .delete(&url)
            .bearer_auth(&token.access_token)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!("Session for {} revoked", self.credentials.username);
                true
            }
            Ok(response) => {
                warn!("Token revoke failed with status {}", response.status());
                false
            }
            Err(e) => {
                warn!("Token revoke request failed: {}", e);
                false
            }
        }
    }

    /// Get the current cached token (if any)
    pub async fn cached_token(&self) -> Option<AuthToken> {
        self.cache.lock().await.get().cloned()
    }

    pub fn username(&self) -> &str {
        &self.credentials.username
    }

    async fn login(&self) -> Result<AuthToken> {
        let url = join_url(&self.credentials.base_url, "authenticate");
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await
            .map_err(|e| ApiError::authentication(format!("Authenticate request failed: {e}")))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::authentication(format!(
                "Authenticate failed with status {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::authentication(format!("Failed to read token response: {e}")))?;

        let token: AuthToken = serde_json::from_str(&body)
            .map_err(|e| ApiError::authentication(format!("Failed to parse token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(ApiError::authentication("Missing access_token in response"));
        }

        Ok(token)
    }
}
