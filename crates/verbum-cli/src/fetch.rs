//! HTTP fetching for the network importers.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;

/// Thin wrapper over one shared [`reqwest::Client`].
///
/// Failures are returned, never retried; importers log them, count them and
/// move on to the next document.
#[derive(Clone)]
pub struct Fetcher {
  client: Client,
  delay:  Duration,
}

impl Fetcher {
  pub fn new(timeout: Duration, delay: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(concat!("verbum/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, delay })
  }

  /// `GET url` and return the body as text.
  pub async fn text(&self, url: &str) -> Result<String> {
    let resp = self
      .client
      .get(url)
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {url} → {}", resp.status()));
    }
    resp.text().await.with_context(|| format!("reading body of {url}"))
  }

  /// Sleep for the configured pause between paced requests.
  pub async fn pause(&self) {
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
  }
}
