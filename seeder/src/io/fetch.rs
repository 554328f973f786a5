//! Page fetching abstraction.
//!
//! Scrapers depend on [`PageFetcher`] rather than a concrete client so tests
//! can serve canned HTML without touching the network.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::blocking::Client;
use tracing::{debug, instrument};

/// Fetch the HTML of a page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET with a browser-like user agent.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("request {url}"))?;
        let status = response.status();
        if !status.is_success() {
            bail!("GET {url} returned HTTP {}", status.as_u16());
        }
        let body = response
            .text()
            .with_context(|| format!("read body of {url}"))?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}
