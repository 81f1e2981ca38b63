//! Configuration module
//!
//! Handles CLI configuration: connection settings for the analytics API and
//! the client tag.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use pdt_client::ConnectionSettings;
use pdt_controller::{HttpBuildRepository, JobController};

/// Connection flags, each backed by an environment variable
#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Base URL of the instance
    #[arg(long, env = "LOOKER_BASE_URL")]
    base_url: String,

    /// API client id
    #[arg(long, env = "LOOKER_CLIENT_ID")]
    client_id: String,

    /// API client secret
    #[arg(long, env = "LOOKER_CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Verify the server's TLS certificate (true/false)
    #[arg(long, env = "LOOKER_VERIFY_SSL")]
    verify_ssl: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "LOOKER_TIMEOUT")]
    timeout: Option<String>,
}

impl ConnectionArgs {
    pub fn into_settings(self) -> Result<ConnectionSettings> {
        let mut extras = HashMap::new();
        if let Some(verify_ssl) = self.verify_ssl {
            extras.insert("verify_ssl".to_string(), verify_ssl);
        }
        if let Some(timeout) = self.timeout {
            extras.insert("timeout".to_string(), timeout);
        }

        let settings = ConnectionSettings::new(self.base_url, self.client_id, self.client_secret)
            .with_extras(&extras)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub connection: ConnectionSettings,
    /// Overrides the default client tag
    pub source: Option<String>,
}

impl Config {
    /// Builds a controller talking to the configured instance
    pub fn controller(&self) -> Result<JobController> {
        let repository = HttpBuildRepository::from_settings(self.connection.clone())
            .context("Failed to create API client")?;

        let controller = JobController::new(Arc::new(repository));
        Ok(match &self.source {
            Some(source) => controller.with_source(source.clone()),
            None => controller,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn args() -> ConnectionArgs {
        ConnectionArgs {
            base_url: "https://looker.example.com".to_string(),
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            verify_ssl: None,
            timeout: None,
        }
    }

    #[test]
    fn test_connection_defaults() {
        let settings = args().into_settings().unwrap();
        assert!(settings.verify_ssl);
        assert_eq!(settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_connection_extras() {
        let settings = ConnectionArgs {
            verify_ssl: Some("false".to_string()),
            timeout: Some("15".to_string()),
            ..args()
        }
        .into_settings()
        .unwrap();
        assert!(!settings.verify_ssl);
        assert_eq!(settings.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_connection_rejects_bad_url() {
        let result = ConnectionArgs {
            base_url: "looker.example.com".to_string(),
            ..args()
        }
        .into_settings();
        assert!(result.is_err());
    }

    #[test]
    fn test_controller_uses_source_override() {
        let config = Config {
            connection: args().into_settings().unwrap(),
            source: Some("nightly-refresh".to_string()),
        };
        assert_eq!(config.controller().unwrap().source(), "nightly-refresh");
    }
}
