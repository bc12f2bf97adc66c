// Report generation from collection results

use serde::{Deserialize, Serialize};
use sitewalk_scanner::{Collection, DocumentKind, StopReason};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

pub fn generate_report(
    collections: &[Collection],
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(collections)),
        ReportFormat::Json => generate_json_report(collections),
        ReportFormat::Csv => Ok(generate_csv_report(collections)),
        ReportFormat::Markdown => Ok(generate_markdown_report(collections)),
    }
}

/// One page URL per line, targets in order.
pub fn generate_text_report(collections: &[Collection]) -> String {
    let mut report = String::new();
    for page in collections.iter().flat_map(|c| c.pages.iter()) {
        report.push_str(page);
        report.push('\n');
    }
    report
}

pub fn generate_json_report(collections: &[Collection]) -> Result<String, serde_json::Error> {
    let targets: Vec<serde_json::Value> = collections
        .iter()
        .map(|c| {
            serde_json::json!({
                "index_url": c.index_url,
                "source": c.source,
                "stop_reason": c.stop_reason,
                "index_error": c.index_error,
                "children_discovered": c.children_discovered,
                "sitemaps_failed": c.failed_sitemaps(),
                "page_count": c.pages.len(),
                "pages": c.pages,
                "sitemaps": c.sitemaps,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Sitewalk",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "targets": collections.len(),
                "total_pages": collections.iter().map(|c| c.pages.len()).sum::<usize>(),
                "sitemaps_failed": collections.iter().map(|c| c.failed_sitemaps()).sum::<usize>()
            },
            "targets": targets
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_csv_report(collections: &[Collection]) -> String {
    let mut report = String::from("index_url,page_url\n");
    for collection in collections {
        let index_url = csv_field(&collection.index_url);
        for page in &collection.pages {
            report.push_str(&format!("{},{}\n", index_url, csv_field(page)));
        }
    }
    report
}

pub fn generate_markdown_report(collections: &[Collection]) -> String {
    let mut report = String::from("# Sitemap Collection Report\n\n");
    report.push_str(&format!(
        "Generated {} by Sitewalk {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        env!("CARGO_PKG_VERSION")
    ));

    for collection in collections {
        report.push_str(&format!("## {}\n\n", collection.index_url));
        report.push_str(&format!("- Source: {}\n", source_label(collection.source)));
        report.push_str(&format!("- Pages: {}\n", collection.pages.len()));
        report.push_str(&format!(
            "- Stopped: {}\n",
            stop_reason_label(collection.stop_reason)
        ));
        if let Some(ref err) = collection.index_error {
            report.push_str(&format!("- Error: {}\n", err));
        }
        report.push('\n');

        if !collection.sitemaps.is_empty() {
            report.push_str("| Sitemap | Found | Added | Error |\n");
            report.push_str("|---|---:|---:|---|\n");
            for sitemap in &collection.sitemaps {
                report.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    markdown_cell(&sitemap.url),
                    sitemap.pages_found,
                    sitemap.pages_added,
                    sitemap.error.as_deref().map(markdown_cell).unwrap_or_default()
                ));
            }
            report.push('\n');
        }

        if !collection.pages.is_empty() {
            report.push_str("### Pages\n\n");
            for page in &collection.pages {
                report.push_str(&format!("- {}\n", page));
            }
            report.push('\n');
        }
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn source_label(source: Option<DocumentKind>) -> &'static str {
    match source {
        Some(DocumentKind::Index) => "sitemap index",
        Some(DocumentKind::Urlset) => "plain sitemap",
        Some(DocumentKind::Unrecognized) => "unrecognized document",
        None => "unavailable",
    }
}

pub fn stop_reason_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::Exhausted => "all sitemaps processed",
        StopReason::CapReached => "page limit reached",
        StopReason::Cancelled => "cancelled",
        StopReason::IndexFailed => "index unavailable",
        StopReason::PlainSitemap => "read as a plain sitemap",
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
