//! Configuration module
//!
//! Handles CLI configuration: where the control-plane lives, which region
//! and profile to address, and how remote commands are polled.

use anyhow::{Result, bail};
use cloudctl_client::ControlPlaneClient;
use cloudctl_exec::PollPolicy;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the control-plane API
    pub endpoint: String,
    /// Region every regional call is addressed to
    pub region: String,
    /// Profile name forwarded to the control-plane
    pub profile: String,
    /// Polling behaviour of remote commands
    pub poll: PollPolicy,
}

impl Config {
    /// Check the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            bail!(
                "endpoint must be an http:// or https:// URL, got '{}'",
                self.endpoint
            );
        }
        if self.region.trim().is_empty() {
            bail!("region cannot be empty");
        }
        self.poll.validate()?;
        Ok(())
    }

    /// Build a client for one command scope
    pub fn client(&self) -> ControlPlaneClient {
        let client = ControlPlaneClient::new(&self.endpoint, &self.region);
        if self.profile.trim().is_empty() {
            client
        } else {
            client.with_profile(&self.profile)
        }
    }
}
