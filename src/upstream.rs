//! Shared plumbing for outbound provider calls

use anyhow::Context;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::{Result, VoiceRelayError};

/// Build the HTTP client shared by all providers.
///
/// Every outbound call is bounded by the configured timeout.
pub fn build_client(config: &HttpConfig) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.as_str())
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Decode a provider response as JSON.
///
/// Non-success statuses become [`VoiceRelayError::Upstream`] carrying the
/// provider's status and body text; bodies that do not match `T` become
/// [`VoiceRelayError::Decode`].
pub async fn read_json<T: DeserializeOwned>(response: Response, provider: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{} returned HTTP {}: {}", provider, status, body);
        return Err(VoiceRelayError::upstream(status, body));
    }

    let bytes = response.bytes().await?;
    debug!("{} returned {} bytes", provider, bytes.len());

    serde_json::from_slice(&bytes)
        .map_err(|e| VoiceRelayError::decode(format!("Invalid {provider} response: {e}")))
}
