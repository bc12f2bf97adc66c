// Tests for report generation functionality

use sitewalk_core::report::{
    ReportFormat, generate_csv_report, generate_json_report, generate_markdown_report,
    generate_report, generate_text_report, save_report, source_label, stop_reason_label,
};
use sitewalk_scanner::{Collection, DocumentKind, SitemapOutcome, StopReason};
use std::fs;
use tempfile::TempDir;

fn sample_collections() -> Vec<Collection> {
    let mut index = Collection::new("https://example.com/sitemap_index.xml".to_string());
    index.source = Some(DocumentKind::Index);
    index.children_discovered = 2;
    index.pages = vec![
        "https://example.com/a".to_string(),
        "https://example.com/b".to_string(),
    ];
    index.sitemaps = vec![
        SitemapOutcome::new("https://example.com/one.xml".to_string(), 3, 2),
        SitemapOutcome::with_error(
            "https://example.com/two.xml".to_string(),
            "HTTP 500 Internal Server Error".to_string(),
        ),
    ];

    let failed = Collection::index_failed(
        "https://other.example/sitemap.xml".to_string(),
        "HTTP 404 Not Found".to_string(),
    );

    vec![index, failed]
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str_text() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("txt"), Some(ReportFormat::Text));
}

#[test]
fn test_report_format_from_str_json() {
    assert_eq!(ReportFormat::from_str("json"), Some(ReportFormat::Json));
}

#[test]
fn test_report_format_from_str_csv() {
    assert_eq!(ReportFormat::from_str("csv"), Some(ReportFormat::Csv));
}

#[test]
fn test_report_format_from_str_markdown() {
    assert_eq!(ReportFormat::from_str("markdown"), Some(ReportFormat::Markdown));
    assert_eq!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert_eq!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("Json"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("CSV"), Some(ReportFormat::Csv));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert_eq!(ReportFormat::from_str("html"), None);
    assert_eq!(ReportFormat::from_str(""), None);
}

// ============================================================================
// Text Report Tests
// ============================================================================

#[test]
fn test_text_report_lists_pages_one_per_line() {
    let report = generate_text_report(&sample_collections());
    assert_eq!(report, "https://example.com/a\nhttps://example.com/b\n");
}

#[test]
fn test_text_report_empty() {
    let report = generate_text_report(&[]);
    assert!(report.is_empty());
}

// ============================================================================
// CSV Report Tests
// ============================================================================

#[test]
fn test_csv_report() {
    let report = generate_csv_report(&sample_collections());
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "index_url,page_url");
    assert_eq!(
        lines[1],
        "https://example.com/sitemap_index.xml,https://example.com/a"
    );
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_csv_report_quotes_fields() {
    let mut collection = Collection::new("https://example.com/s.xml".to_string());
    collection.pages = vec!["https://example.com/a,b".to_string()];
    let report = generate_csv_report(&[collection]);
    assert!(report.contains("\"https://example.com/a,b\""));
}

// ============================================================================
// JSON Report Tests
// ============================================================================

#[test]
fn test_json_report_structure() {
    let report = generate_json_report(&sample_collections()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    let root = &value["report"];
    assert_eq!(root["metadata"]["generator"], "Sitewalk");
    assert_eq!(root["metadata"]["format"], "json");
    assert!(root["metadata"]["generated_at"].is_string());
    assert_eq!(root["summary"]["targets"], 2);
    assert_eq!(root["summary"]["total_pages"], 2);
    assert_eq!(root["summary"]["sitemaps_failed"], 1);

    let first = &root["targets"][0];
    assert_eq!(first["source"], "index");
    assert_eq!(first["stop_reason"], "exhausted");
    assert_eq!(first["page_count"], 2);
    assert_eq!(first["pages"][1], "https://example.com/b");
    assert_eq!(first["sitemaps"][1]["error"], "HTTP 500 Internal Server Error");

    let second = &root["targets"][1];
    assert!(second["source"].is_null());
    assert_eq!(second["stop_reason"], "index_failed");
    assert_eq!(second["index_error"], "HTTP 404 Not Found");
}

// ============================================================================
// Markdown Report Tests
// ============================================================================

#[test]
fn test_markdown_report() {
    let report = generate_markdown_report(&sample_collections());
    assert!(report.starts_with("# Sitemap Collection Report"));
    assert!(report.contains("## https://example.com/sitemap_index.xml"));
    assert!(report.contains("- Source: sitemap index"));
    assert!(report.contains("| https://example.com/one.xml | 3 | 2 |  |"));
    assert!(report.contains("HTTP 500 Internal Server Error"));
    assert!(report.contains("- https://example.com/a"));
    assert!(report.contains("- Error: HTTP 404 Not Found"));
}

#[test]
fn test_labels() {
    assert_eq!(source_label(None), "unavailable");
    assert_eq!(source_label(Some(DocumentKind::Urlset)), "plain sitemap");
    assert_eq!(stop_reason_label(StopReason::CapReached), "page limit reached");
}

// ============================================================================
// Dispatch and Saving
// ============================================================================

#[test]
fn test_generate_report_dispatches_by_format() {
    let collections = sample_collections();
    assert_eq!(
        generate_report(&collections, ReportFormat::Text).unwrap(),
        generate_text_report(&collections)
    );
    assert_eq!(
        generate_report(&collections, ReportFormat::Csv).unwrap(),
        generate_csv_report(&collections)
    );
    assert!(
        generate_report(&collections, ReportFormat::Json)
            .unwrap()
            .contains("\"report\"")
    );
}

#[test]
fn test_save_report() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("pages.txt");

    save_report("https://example.com/a\n", &path)?;

    assert_eq!(fs::read_to_string(&path)?, "https://example.com/a\n");
    Ok(())
}

#[test]
fn test_save_report_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("pages.txt");
    assert!(save_report("x", &path).is_err());
}
