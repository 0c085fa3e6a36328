//! cloudctl HTTP Client
//!
//! A type-safe HTTP client for the control-plane API.
//!
//! One [`ControlPlaneClient`] is bound to a single region. Every method issues
//! exactly one HTTP request. The client also implements the command
//! capabilities of `cloudctl-exec`, so it can drive a
//! [`JobPoller`](cloudctl_exec::JobPoller) directly.
//!
//! # Example
//!
//! ```no_run
//! use cloudctl_client::ControlPlaneClient;
//!
//! #[tokio::main]
//! async fn main() -> cloudctl_client::Result<()> {
//!     let client = ControlPlaneClient::new("http://localhost:8080", "ap-northeast-2");
//!
//!     for instance in client.list_instances().await? {
//!         println!("{} is {}", instance.instance_id, instance.state);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
mod commands;
mod images;
mod instances;
mod regions;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// Header carrying the caller's profile name
pub const PROFILE_HEADER: &str = "x-cloudctl-profile";

/// HTTP client for the control-plane API
///
/// Methods are organized into logical groups:
/// - Instances (list, start, stop, reboot, launch, tag)
/// - Regions and availability zones
/// - Images (list, create)
/// - Remote commands (send, get invocation)
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    /// Base URL of the control-plane (e.g., "http://localhost:8080")
    base_url: String,
    /// Region every regional call is addressed to
    region: String,
    /// Profile name forwarded with every request
    profile: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl ControlPlaneClient {
    /// Create a new control-plane client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the control-plane API (e.g., "http://localhost:8080")
    /// * `region` - The region to address (e.g., "ap-northeast-2")
    ///
    /// # Example
    /// ```
    /// use cloudctl_client::ControlPlaneClient;
    ///
    /// let client = ControlPlaneClient::new("http://localhost:8080", "ap-northeast-2");
    /// assert_eq!(client.region(), "ap-northeast-2");
    /// ```
    pub fn new(base_url: impl Into<String>, region: impl Into<String>) -> Self {
        Self::with_client(base_url, region, Client::new())
    }

    /// Create a new control-plane client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cloudctl_client::ControlPlaneClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = ControlPlaneClient::with_client("http://localhost:8080", "us-east-1", http_client);
    /// ```
    pub fn with_client(
        base_url: impl Into<String>,
        region: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            region: region.into(),
            profile: None,
            client,
        }
    }

    /// Forward a profile name with every request
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Get the base URL of the control-plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the region this client addresses
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Check that the control-plane is reachable
    pub async fn health(&self) -> Result<()> {
        let url = self.url(&["health"])?;
        let response = self.request(Method::GET, url).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Request Builders
    // =============================================================================

    /// URL of `segments` below the base URL
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside an id can
    /// never address a different path.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let invalid_base =
            || ClientError::InvalidRequest(format!("invalid base URL '{}'", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// URL of a region-scoped API path
    fn regional_url(&self, segments: &[&str]) -> Result<Url> {
        let mut path = vec!["api", self.region.as_str()];
        path.extend_from_slice(segments);
        self.url(&path)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.profile {
            Some(profile) => builder.header(PROFILE_HEADER, profile),
            None => builder,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

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

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

/// Reject identifiers that cannot be used as a single path segment
fn require_id(kind: &str, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ClientError::InvalidRequest(format!("{} cannot be empty", kind)));
    }
    if id == "." || id == ".." || id.contains(['/', '?', '#']) {
        return Err(ClientError::InvalidRequest(format!(
            "{} '{}' is not a valid identifier",
            kind, id
        )));
    }
    Ok(())
}
