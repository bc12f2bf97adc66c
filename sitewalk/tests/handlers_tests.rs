use sitewalk::handlers::*;
use sitewalk_scanner::{Collection, DocumentKind, SitemapOutcome, StopReason};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use url::Url;

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("https://example.com/sitemap.xml");
    assert_eq!(result, Some("https://example.com/sitemap.xml".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("example.com/sitemap.xml");
    assert_eq!(result, Some("http://example.com/sitemap.xml".to_string()));
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_urls_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://example.com/sitemap_index.xml")?;
    writeln!(temp_file, "# staging is down")?;
    writeln!(temp_file, "docs.example.org/sitemap.xml")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "  https://blog.example.com/sitemap.xml  ")?;

    let path = PathBuf::from(temp_file.path());
    let urls = load_urls_from_file(&path)?;

    assert_eq!(urls.len(), 3);
    assert_eq!(urls[0], "https://example.com/sitemap_index.xml");
    assert_eq!(urls[1], "http://docs.example.org/sitemap.xml");
    assert_eq!(urls[2], "https://blog.example.com/sitemap.xml");

    Ok(())
}

#[test]
fn test_load_urls_from_file_empty() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file).unwrap();
    writeln!(temp_file, "   ").unwrap();

    let path = PathBuf::from(temp_file.path());
    let result = load_urls_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("No valid URLs"));
}

#[test]
fn test_load_urls_from_file_missing() {
    let path = PathBuf::from("/nonexistent/sitewalk/hosts.txt");
    let result = load_urls_from_file(&path);

    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Failed to read hosts file"));
}

#[test]
fn test_load_urls_from_source_single_url() {
    let url = Url::parse("https://example.com").unwrap();
    let result = load_urls_from_source(Some(&url), None).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0], "https://example.com/");
}

#[test]
fn test_load_urls_from_source_prefers_hosts_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "https://from-file.example/sitemap.xml")?;

    let url = Url::parse("https://example.com/sitemap.xml")?;
    let path = PathBuf::from(temp_file.path());
    let result = load_urls_from_source(Some(&url), Some(&path))?;

    assert_eq!(result, vec!["https://from-file.example/sitemap.xml"]);
    Ok(())
}

#[test]
fn test_load_urls_from_source_no_input() {
    let result = load_urls_from_source(None, None);
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .contains("Either --url or --hosts-file must be provided")
    );
}

#[test]
fn test_summarize_collection() {
    let mut collection = Collection::new("https://example.com/sitemap_index.xml".to_string());
    collection.source = Some(DocumentKind::Index);
    collection.children_discovered = 3;
    collection.pages = vec!["/a".to_string(), "/b".to_string()];
    collection.stop_reason = StopReason::CapReached;
    collection.sitemaps = vec![
        SitemapOutcome::new("https://example.com/one.xml".to_string(), 2, 2),
        SitemapOutcome::with_error(
            "https://example.com/two.xml".to_string(),
            "HTTP 500 Internal Server Error".to_string(),
        ),
    ];

    let line = summarize_collection(&collection);

    assert_eq!(
        line,
        "https://example.com/sitemap_index.xml: 2 pages (sitemap index, page limit reached), 1 of 3 sitemaps failed"
    );
}

#[test]
fn test_summarize_failed_index() {
    let collection = Collection::index_failed(
        "https://example.com/sitemap.xml".to_string(),
        "HTTP 404 Not Found".to_string(),
    );

    let line = summarize_collection(&collection);

    assert!(
        line.starts_with("https://example.com/sitemap.xml: 0 pages (unavailable, index unavailable)")
    );
    assert!(line.ends_with(": HTTP 404 Not Found"));
}
