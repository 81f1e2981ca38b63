//! Connection settings
//!
//! Everything needed to reach and authenticate against the analytics API.
//! Settings are handed to [`LookerClient::new`](crate::LookerClient::new)
//! explicitly; there is no global registry.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Url;

use crate::error::{ClientError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection parameters for the analytics API
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Base URL of the instance (e.g., "https://acme.cloud.looker.com")
    pub base_url: String,
    /// API client id
    pub client_id: String,
    /// API client secret
    pub client_secret: String,
    /// Verify the server's TLS certificate
    pub verify_ssl: bool,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ConnectionSettings {
    /// Creates settings with default TLS verification and timeout
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Applies the string-valued extras a stored connection carries
    ///
    /// Recognized keys are `verify_ssl` and `timeout` (seconds). Other keys
    /// are ignored.
    pub fn apply_extras(&mut self, extras: &HashMap<String, String>) -> Result<()> {
        if let Some(value) = extras.get("verify_ssl") {
            self.verify_ssl = parse_bool(value).ok_or_else(|| {
                ClientError::Configuration(format!("verify_ssl must be a boolean, got `{}`", value))
            })?;
        }

        if let Some(value) = extras.get("timeout") {
            let secs = value.trim().parse::<u64>().map_err(|_| {
                ClientError::Configuration(format!(
                    "timeout must be a whole number of seconds, got `{}`",
                    value
                ))
            })?;
            self.timeout = Duration::from_secs(secs);
        }

        Ok(())
    }

    /// Builder-style variant of [`apply_extras`](Self::apply_extras)
    pub fn with_extras(mut self, extras: &HashMap<String, String>) -> Result<Self> {
        self.apply_extras(extras)?;
        Ok(self)
    }

    /// Validates the settings
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("base_url", &self.base_url),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Configuration(format!(
                    "required parameter `{}` is missing",
                    name
                )));
            }
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Configuration(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        Url::parse(&self.base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url: {}", e)))?;

        if self.timeout.is_zero() {
            return Err(ClientError::Configuration(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Lenient boolean used by connection extras and environment variables
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
