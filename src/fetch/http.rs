// src/fetch/http.rs

use super::PageFetcher;
use crate::error::{Result, ScrapeError};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

const USER_AGENT: &str = concat!("unwanted_records/", env!("CARGO_PKG_VERSION"));

/// Plain GET, no JavaScript. fbref serves its tables in the initial HTML
/// (some commented out), which the extractor copes with.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::Config(format!("building http client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<String> {
        let html = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?
            .error_for_status()
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?
            .text()
            .await
            .map_err(|e| ScrapeError::fetch(url.as_str(), e))?;
        debug!(bytes = html.len(), "fetched page");
        Ok(html)
    }
}
