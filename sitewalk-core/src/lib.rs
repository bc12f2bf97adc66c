pub mod collect;
pub mod report;

pub use collect::{CollectOptions, CollectProgressCallback, execute_collect, total_pages};
pub use report::{ReportFormat, generate_report, save_report};
