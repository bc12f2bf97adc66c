pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{load_urls_from_file, load_urls_from_source, parse_url_line};

// Re-export collection functionality from sitewalk-core
pub use sitewalk_core::collect::{CollectOptions, CollectProgressCallback, execute_collect};
