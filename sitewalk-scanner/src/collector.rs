use crate::document::{DocumentKind, SitemapDocument, extract_child_sitemaps, extract_page_urls};
use crate::error::Result;
use crate::fetcher::SitemapFetcher;
use crate::result::{Collection, SitemapOutcome, StopReason};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Called before each sitemap fetch with its position (0 for the index,
/// 1.. for children in discovery order) and its URL.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub const DEFAULT_POLITENESS_DELAY: Duration = Duration::from_millis(500);

/// Walks a sitemap index and flattens it into unique page URLs.
pub struct IndexCollector {
    fetcher: SitemapFetcher,
    politeness_delay: Duration,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl IndexCollector {
    pub fn new(fetcher: SitemapFetcher) -> Self {
        Self {
            fetcher,
            politeness_delay: DEFAULT_POLITENESS_DELAY,
            concurrency: 1,
            progress_callback: None,
        }
    }

    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Maximum child sitemaps in flight. 1 (the default) is strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Collect up to `max_pages` unique page URLs (`None` for no limit).
    ///
    /// Never fails: an unreachable index yields an empty list and a broken
    /// child sitemap is skipped.
    pub async fn collect(&self, index_url: &str, max_pages: Option<usize>) -> Vec<String> {
        self.collect_detailed(index_url, max_pages, None).await.pages
    }

    /// Same as [`collect`](Self::collect), but reports per-sitemap outcomes
    /// and honors an optional cancellation token. On cancellation the pages
    /// gathered so far are kept.
    pub async fn collect_detailed(
        &self,
        index_url: &str,
        max_pages: Option<usize>,
        cancel: Option<&CancellationToken>,
    ) -> Collection {
        let mut collection = Collection::new(index_url.to_string());

        self.report_progress(0, index_url);
        let index = match self.fetch_or_cancel(index_url, cancel).await {
            None => {
                collection.stop_reason = StopReason::Cancelled;
                return collection;
            }
            Some(Ok(doc)) => doc,
            Some(Err(e)) => {
                error!(
                    "Failed to collect pages from sitemap index {}: {}",
                    index_url, e
                );
                return Collection::index_failed(index_url.to_string(), e.to_string());
            }
        };
        collection.source = Some(index.kind());

        let children = extract_child_sitemaps(&index);
        let mut pages = PageAccumulator::new(max_pages);

        if children.is_empty() {
            warn!("No sitemaps found in the sitemap index {}", index_url);
            pages.merge(extract_page_urls(&index));
            collection.pages = pages.into_pages();
            collection.stop_reason = StopReason::PlainSitemap;
            return collection;
        }

        info!("Found {} sitemaps in the index {}", children.len(), index_url);
        collection.children_discovered = children.len();

        collection.stop_reason = if self.concurrency > 1 {
            self.collect_concurrent(&children, &mut pages, &mut collection.sitemaps, cancel)
                .await
        } else {
            self.collect_sequential(&children, &mut pages, &mut collection.sitemaps, cancel)
                .await
        };

        collection.pages = pages.into_pages();
        info!(
            "Collected a total of {} unique URLs from {}",
            collection.pages.len(),
            index_url
        );
        collection
    }

    async fn collect_sequential(
        &self,
        children: &[String],
        pages: &mut PageAccumulator,
        outcomes: &mut Vec<SitemapOutcome>,
        cancel: Option<&CancellationToken>,
    ) -> StopReason {
        for (idx, child_url) in children.iter().enumerate() {
            if pages.is_full() {
                return StopReason::CapReached;
            }

            self.report_progress(idx + 1, child_url);
            let Some(fetched) = self.fetch_or_cancel(child_url, cancel).await else {
                return StopReason::Cancelled;
            };
            outcomes.push(merge_child(child_url, fetched, pages));

            if idx + 1 == children.len() || pages.is_full() {
                continue;
            }
            if !self.pause(cancel).await {
                return StopReason::Cancelled;
            }
        }

        if pages.is_full() {
            StopReason::CapReached
        } else {
            StopReason::Exhausted
        }
    }

    /// Fetches up to `concurrency` children at once. `buffered` hands results
    /// back in discovery order, so merging sees the same sequence as the
    /// sequential walk.
    async fn collect_concurrent(
        &self,
        children: &[String],
        pages: &mut PageAccumulator,
        outcomes: &mut Vec<SitemapOutcome>,
        cancel: Option<&CancellationToken>,
    ) -> StopReason {
        let spacing = RequestSpacing::new(self.politeness_delay);
        let spacing = &spacing;

        let fetches = stream::iter(children.iter().enumerate())
            .map(move |(idx, child_url)| async move {
                spacing.wait().await;
                self.report_progress(idx + 1, child_url);
                (child_url, self.fetcher.fetch(child_url).await)
            })
            .buffered(self.concurrency);
        futures::pin_mut!(fetches);

        loop {
            if pages.is_full() {
                return StopReason::CapReached;
            }

            let next = match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => return StopReason::Cancelled,
                    next = fetches.next() => next,
                },
                None => fetches.next().await,
            };

            let Some((child_url, fetched)) = next else {
                break;
            };
            outcomes.push(merge_child(child_url, fetched, pages));
        }

        if pages.is_full() {
            StopReason::CapReached
        } else {
            StopReason::Exhausted
        }
    }

    /// `None` when cancelled before the fetch completed.
    async fn fetch_or_cancel(
        &self,
        url: &str,
        cancel: Option<&CancellationToken>,
    ) -> Option<Result<SitemapDocument>> {
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Cancelled before {} was fetched", url);
                    None
                }
                result = self.fetcher.fetch(url) => Some(result),
            },
            None => Some(self.fetcher.fetch(url).await),
        }
    }

    /// Politeness delay between children. Returns false if cancelled.
    async fn pause(&self, cancel: Option<&CancellationToken>) -> bool {
        let delay = tokio::time::sleep(self.politeness_delay);
        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = delay => true,
            },
            None => {
                delay.await;
                true
            }
        }
    }

    fn report_progress(&self, position: usize, url: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(position, url.to_string());
        }
    }
}

fn merge_child(
    url: &str,
    fetched: Result<SitemapDocument>,
    pages: &mut PageAccumulator,
) -> SitemapOutcome {
    match fetched {
        Ok(doc) => {
            if doc.kind() != DocumentKind::Urlset {
                debug!("Sitemap {} is not a urlset ({:?})", url, doc.kind());
            }
            let urls = extract_page_urls(&doc);
            let found = urls.len();
            info!("Found {} URLs in sitemap {}", found, url);
            let added = pages.merge(urls);
            SitemapOutcome::new(url.to_string(), found, added)
        }
        Err(e) => {
            warn!("Error processing sitemap {}: {}", url, e);
            SitemapOutcome::with_error(url.to_string(), e.to_string())
        }
    }
}

/// Insertion-ordered, duplicate-free page list with an optional cap.
struct PageAccumulator {
    pages: Vec<String>,
    seen: HashSet<String>,
    cap: Option<usize>,
}

impl PageAccumulator {
    fn new(cap: Option<usize>) -> Self {
        Self {
            pages: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    fn is_full(&self) -> bool {
        self.cap.is_some_and(|cap| self.pages.len() >= cap)
    }

    /// Append unseen URLs until the cap is hit. Returns how many were added.
    fn merge(&mut self, urls: impl IntoIterator<Item = String>) -> usize {
        let mut added = 0;
        for url in urls {
            if self.is_full() {
                break;
            }
            if self.seen.insert(url.clone()) {
                self.pages.push(url);
                added += 1;
            }
        }
        added
    }

    fn into_pages(self) -> Vec<String> {
        self.pages
    }
}

/// Minimum spacing between request starts, shared by concurrent fetches.
struct RequestSpacing {
    min_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RequestSpacing {
    fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            last_request: Mutex::new(None),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}
