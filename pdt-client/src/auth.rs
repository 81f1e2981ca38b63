//! API login and access token caching

use std::time::{Duration, Instant};

use pdt_core::dto::build::AccessToken;
use tracing::debug;

use crate::LookerClient;
use crate::error::{ClientError, Result};

/// Tokens are refreshed this long before the service would expire them
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    access_token: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn new(token: AccessToken, now: Instant) -> Self {
        // A lifetime too large to represent is treated as no expiry
        let expires_at = token.expires_in.and_then(|secs| {
            now.checked_add(Duration::from_secs(secs).saturating_sub(REFRESH_MARGIN))
        });
        Self {
            access_token: token.access_token,
            expires_at,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

impl LookerClient {
    /// Log in with the client credentials
    ///
    /// # Returns
    /// A fresh access token; it is not cached by this call
    pub async fn login(&self) -> Result<AccessToken> {
        let url = self.endpoint(["login"])?;
        let response = self
            .client
            .post(url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Current access token, logging in when none is cached or it is about to expire
    pub(crate) async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another task may have logged in while we waited for the lock
        if let Some(token) = guard.as_ref() {
            if token.is_fresh(Instant::now()) {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Logging in to {}", self.base_url);
        let token = CachedToken::new(self.login().await?, Instant::now());
        let access_token = token.access_token.clone();
        *guard = Some(token);

        Ok(access_token)
    }

    /// Drops the cached token when the service rejected it, so the next call logs in again
    pub(crate) async fn forget_rejected_token(&self, err: &ClientError) {
        if err.is_unauthorized() {
            debug!("Access token rejected, discarding it");
            self.token.write().await.take();
        }
    }
}
