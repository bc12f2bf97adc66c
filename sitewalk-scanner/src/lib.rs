pub mod collector;
pub mod document;
pub mod error;
pub mod fetcher;
pub mod result;

pub use collector::{DEFAULT_POLITENESS_DELAY, IndexCollector, ProgressCallback};
pub use document::{DocumentKind, SitemapDocument};
pub use error::SitemapError;
pub use fetcher::SitemapFetcher;
pub use result::{Collection, SitemapOutcome, StopReason};
pub use tokio_util::sync::CancellationToken;
