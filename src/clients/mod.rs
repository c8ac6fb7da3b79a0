//! HTTP clients for the two metadata sources.
//!
//! Both return the raw JSON body so the synchronizer sees exactly what the
//! sheet's fetch formulas would have produced.

pub mod animeapi;
pub mod jikan;

pub use animeapi::AnimeApiClient;
pub use jikan::JikanClient;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("anisheet/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_http_client(timeout_seconds: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// GETs `url` and returns its body. A 404 is `None`.
pub(crate) async fn fetch_raw(client: &Client, source: &str, url: &str) -> Result<Option<String>> {
    debug!(source, url, "Fetching metadata payload");
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("{source} request failed: {url}"))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("{source} API error: {status} - {body}"));
    }

    Ok(Some(response.text().await?))
}
