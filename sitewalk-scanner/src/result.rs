use crate::document::DocumentKind;
use serde::{Deserialize, Serialize};

/// Why a collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every child sitemap was processed.
    Exhausted,
    /// The page cap was reached; remaining children were not fetched.
    CapReached,
    /// The cancellation token fired.
    Cancelled,
    /// The index itself could not be fetched or parsed.
    IndexFailed,
    /// The index URL held a plain urlset (or nothing usable) and was read directly.
    PlainSitemap,
}

/// What happened to one child sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapOutcome {
    pub url: String,
    pub pages_found: usize,
    pub pages_added: usize,
    pub error: Option<String>,
}

impl SitemapOutcome {
    pub fn new(url: String, pages_found: usize, pages_added: usize) -> Self {
        Self {
            url,
            pages_found,
            pages_added,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            pages_found: 0,
            pages_added: 0,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one collection run over a sitemap index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub index_url: String,
    /// Unique page URLs in first-seen order.
    pub pages: Vec<String>,
    /// Shape of the root document; `None` if it never arrived.
    pub source: Option<DocumentKind>,
    pub children_discovered: usize,
    pub sitemaps: Vec<SitemapOutcome>,
    pub stop_reason: StopReason,
    pub index_error: Option<String>,
}

impl Collection {
    pub fn new(index_url: String) -> Self {
        Self {
            index_url,
            pages: Vec::new(),
            source: None,
            children_discovered: 0,
            sitemaps: Vec::new(),
            stop_reason: StopReason::Exhausted,
            index_error: None,
        }
    }

    pub fn index_failed(index_url: String, error: String) -> Self {
        Self {
            stop_reason: StopReason::IndexFailed,
            index_error: Some(error),
            ..Self::new(index_url)
        }
    }

    pub fn failed_sitemaps(&self) -> usize {
        self.sitemaps.iter().filter(|s| s.is_error()).count()
    }
}
