//! PDT HTTP Client
//!
//! A typed HTTP client for the parts of the analytics API that drive PDT
//! (persistent derived table) materialization jobs: login, version discovery,
//! and starting, stopping and checking builds.
//!
//! # Example
//!
//! ```no_run
//! use pdt_client::{ConnectionSettings, LookerClient};
//! use pdt_core::dto::build::StartBuild;
//!
//! #[tokio::main]
//! async fn main() -> pdt_client::Result<()> {
//!     let settings = ConnectionSettings::new("https://acme.cloud.looker.com", "id", "secret");
//!     let client = LookerClient::new(settings)?;
//!
//!     let started = client
//!         .start_pdt_build(&StartBuild::new("sales", "daily_orders"), "pdtctl:0.1.0")
//!         .await?;
//!
//!     println!("Started build: {:?}", started.materialization_id);
//!     Ok(())
//! }
//! ```

mod auth;
mod builds;
pub mod error;
pub mod settings;

pub use error::{ClientError, Result};
pub use settings::{ConnectionSettings, parse_bool};

use std::fmt;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::auth::CachedToken;

/// API version prefix used for every endpoint
pub const API_VERSION: &str = "4.0";

/// HTTP client for the analytics API
///
/// Cheap to clone; clones share the connection pool and the cached access
/// token.
#[derive(Clone)]
pub struct LookerClient {
    /// Base URL of the instance, without trailing slash
    base_url: String,
    client_id: String,
    client_secret: String,
    /// HTTP client instance
    client: Client,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl LookerClient {
    /// Create a new client from connection settings
    ///
    /// The settings are validated and turned into a reqwest client honoring
    /// the TLS verification flag and request timeout.
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        settings.validate()?;

        let client = Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(!settings.verify_ssl)
            .build()?;

        Ok(Self::with_client(settings, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS roots, etc. The timeout and
    /// `verify_ssl` fields of `settings` are not applied in this case.
    pub fn with_client(settings: ConnectionSettings, client: Client) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client_id: settings.client_id,
            client_secret: settings.client_secret,
            client,
            token: Arc::new(RwLock::new(None)),
        }
    }

    /// Get the base URL of the instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an API URL from path segments, percent-encoding each one
    fn endpoint<I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Configuration(format!("invalid base_url: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ClientError::Configuration("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .push("api")
            .push(API_VERSION)
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Send an authenticated request and deserialize its JSON body
    async fn send_authorized<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let token = self.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let result = self.handle_response(response).await;
        if let Err(e) = &result {
            self.forget_rejected_token(e).await;
        }
        result
    }

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl fmt::Debug for LookerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookerClient")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> ConnectionSettings {
        ConnectionSettings::new(base_url, "id", "secret")
    }

    #[test]
    fn test_client_creation() {
        let client = LookerClient::new(settings("https://looker.example.com")).unwrap();
        assert_eq!(client.base_url(), "https://looker.example.com");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = LookerClient::new(settings("https://looker.example.com/")).unwrap();
        assert_eq!(client.base_url(), "https://looker.example.com");
    }

    #[test]
    fn test_client_rejects_invalid_settings() {
        let err = LookerClient::new(settings("")).unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[test]
    fn test_client_with_custom_client() {
        let client = LookerClient::with_client(settings("http://localhost:19999"), Client::new());
        assert_eq!(client.base_url(), "http://localhost:19999");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client =
            LookerClient::with_client(settings("https://looker.example.com"), Client::new());
        let url = client
            .endpoint(["derived_table", "my model", "a/b", "start"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://looker.example.com/api/4.0/derived_table/my%20model/a%2Fb/start"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            LookerClient::with_client(settings("https://proxy.example.com/looker"), Client::new());
        let url = client.endpoint(["versions"]).unwrap();
        assert_eq!(url.as_str(), "https://proxy.example.com/looker/api/4.0/versions");
    }

    #[test]
    fn test_debug_hides_secret() {
        let client =
            LookerClient::with_client(settings("https://looker.example.com"), Client::new());
        assert!(!format!("{:?}", client).contains("secret"));
    }
}
