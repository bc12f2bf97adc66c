use indicatif::{ProgressBar, ProgressStyle};
use sitewalk_scanner::{
    CancellationToken, Collection, DEFAULT_POLITENESS_DELAY, IndexCollector, SitemapFetcher,
    StopReason, fetcher::DEFAULT_TIMEOUT_SECS, fetcher::DEFAULT_USER_AGENT,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Options for configuring a collection run
pub struct CollectOptions {
    pub urls: Vec<String>,
    pub max_pages: Option<usize>,
    pub delay: Duration,
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub show_progress_bars: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            max_pages: None,
            delay: DEFAULT_POLITENESS_DELAY,
            concurrency: 1,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting per-target progress messages
pub type CollectProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Collect every index URL in `options.urls`, one after the other.
/// Returns one [`Collection`] per target that was started.
pub async fn execute_collect(
    options: CollectOptions,
    progress_callback: Option<CollectProgressCallback>,
    cancel: Option<&CancellationToken>,
) -> Result<Vec<Collection>, String> {
    let CollectOptions {
        urls,
        max_pages,
        delay,
        concurrency,
        timeout_secs,
        user_agent,
        show_progress_bars,
    } = options;

    if urls.is_empty() {
        return Err("No sitemap index URLs to collect".to_string());
    }

    let fetcher = SitemapFetcher::with_timeout(timeout_secs)
        .and_then(|fetcher| fetcher.with_user_agent(&user_agent))
        .map_err(|e| format!("Failed to set up fetcher: {}", e))?;

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .map_err(|e| format!("Invalid progress template: {}", e))?;
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching sitemap index...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut collector = IndexCollector::new(fetcher)
        .with_politeness_delay(delay)
        .with_concurrency(concurrency);

    if let Some(ref pb) = progress_bar {
        let pb_clone = pb.clone();
        collector = collector.with_progress_callback(Arc::new(move |position, url| {
            pb_clone.set_message(spinner_message(position, &url));
        }));
    }

    let mut collections = Vec::with_capacity(urls.len());
    for (idx, url) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Collecting index {}/{}: {}",
                idx + 1,
                urls.len(),
                url
            ));
        }

        let collection = collector.collect_detailed(url, max_pages, cancel).await;

        if let Some(ref err) = collection.index_error {
            warn!("Skipping {}: {}", url, err);
            if let Some(ref callback) = progress_callback {
                callback(format!("[!] Failed to read index {}: {}", url, err));
            }
        }

        let cancelled = collection.stop_reason == StopReason::Cancelled;
        collections.push(collection);
        if cancelled {
            if let Some(ref callback) = progress_callback {
                callback("[!] Collection cancelled".to_string());
            }
            break;
        }
    }

    if let Some(ref pb) = progress_bar {
        let read: usize = collections.iter().map(|c| c.sitemaps.len()).sum();
        pb.finish_with_message(format!(
            "Collection complete! {} child sitemaps read, {} unique URLs",
            read,
            total_pages(&collections)
        ));
    }

    Ok(collections)
}

/// Spinner text for a fetch that is about to start. Position 0 is the index.
fn spinner_message(position: usize, url: &str) -> String {
    if position == 0 {
        format!("Fetching sitemap index... {}", url)
    } else {
        format!("Fetching sitemap {}... {}", position, url)
    }
}

/// Total pages over all targets.
pub fn total_pages(collections: &[Collection]) -> usize {
    collections.iter().map(|c| c.pages.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_message_names_the_pending_fetch() {
        assert_eq!(
            spinner_message(0, "https://example.com/sitemap_index.xml"),
            "Fetching sitemap index... https://example.com/sitemap_index.xml"
        );
        assert_eq!(
            spinner_message(3, "https://example.com/blog.xml"),
            "Fetching sitemap 3... https://example.com/blog.xml"
        );
    }
}
