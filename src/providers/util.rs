use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Builds the HTTP client shared by all providers. Every request made with
/// it is bounded by `timeout`.
pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent("fxconv/1.0")
        .timeout(timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Performs a GET on `url` and decodes the JSON body. `subject` names what
/// is being fetched in error messages.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    subject: &str,
) -> Result<T> {
    debug!("Requesting {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Request error for {subject}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {} for {}", response.status(), subject));
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to get response text for {subject}"))?;

    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", subject, e))
}
