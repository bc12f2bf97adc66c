use crate::document::SitemapDocument;
use crate::error::{Result, SitemapError};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("Sitewalk/", env!("CARGO_PKG_VERSION"));

/// Fetches a sitemap over HTTP and parses it. Holds no state beyond the
/// connection pool, so every call is independent.
#[derive(Clone)]
pub struct SitemapFetcher {
    client: Client,
    timeout_secs: u64,
}

impl SitemapFetcher {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs, DEFAULT_USER_AGENT)?,
            timeout_secs,
        })
    }

    /// Rebuilds the client with this User-Agent, keeping the timeout.
    pub fn with_user_agent(mut self, user_agent: &str) -> Result<Self> {
        self.client = build_client(self.timeout_secs, user_agent)?;
        Ok(self)
    }

    /// Replaces the client outright. Its own timeout and headers apply.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// GET `url` and parse the body as a sitemap.
    ///
    /// Non-success statuses fail with [`SitemapError::Status`]; malformed
    /// bodies fail with [`SitemapError::ParseError`].
    pub async fn fetch(&self, url: &str) -> Result<SitemapDocument> {
        debug!("Fetching sitemap: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                SitemapError::InvalidUrl(format!("{}: {}", url, e))
            } else {
                SitemapError::HttpError(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await?;
        SitemapDocument::parse(&body)
    }
}

fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs((timeout_secs / 2).max(1)))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SitemapError::Other(format!("Failed to create HTTP client: {}", e)))
}
