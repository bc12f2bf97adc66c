use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use sitewalk_core::collect::{CollectOptions, CollectProgressCallback, execute_collect};
use sitewalk_core::report::{
    ReportFormat, generate_report, save_report, source_label, stop_reason_label,
};
use sitewalk_scanner::fetcher::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use sitewalk_scanner::{CancellationToken, Collection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file. Blank lines and `#` comments are skipped.
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(parse_url_line)
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("{} Skipping invalid URL '{}'", "⚠".yellow(), line);
    None
}

/// Sets the logging level using RUST_LOG, falling back to the supplied default.
/// Logs go to stderr so stdout stays a clean report.
pub fn setup_logging(default_log_settings: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_log_settings.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init()
}

pub fn print_banner() {
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!(
        "{} {}",
        "  SITEWALK".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
    eprintln!("  sitemap index → page URLs");
    eprintln!("{}", "═".repeat(60).bright_blue().bold());
    eprintln!();
}

/// Build collection options from the `collect` subcommand's arguments.
pub fn collect_options_from_args(
    args: &ArgMatches,
    urls: Vec<String>,
    quiet: bool,
) -> CollectOptions {
    CollectOptions {
        urls,
        max_pages: args.get_one::<usize>("max-pages").copied(),
        delay: Duration::from_millis(args.get_one::<u64>("delay-ms").copied().unwrap_or(500)),
        concurrency: args.get_one::<usize>("threads").copied().unwrap_or(1),
        timeout_secs: args
            .get_one::<u64>("timeout")
            .copied()
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        user_agent: args
            .get_one::<String>("user-agent")
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        show_progress_bars: !quiet,
    }
}

/// One summary line per target, e.g.
/// `https://example.com/sitemap.xml: 120 pages (sitemap index, all sitemaps processed)`.
pub fn summarize_collection(collection: &Collection) -> String {
    let mut line = format!(
        "{}: {} pages ({}, {})",
        collection.index_url,
        collection.pages.len(),
        source_label(collection.source),
        stop_reason_label(collection.stop_reason)
    );

    let failed = collection.failed_sitemaps();
    if failed > 0 {
        line.push_str(&format!(
            ", {} of {} sitemaps failed",
            failed, collection.children_discovered
        ));
    }
    if let Some(ref err) = collection.index_error {
        line.push_str(&format!(": {}", err));
    }
    line
}

pub async fn handle_collect(
    args: &ArgMatches,
    quiet: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let url = args.get_one::<Url>("url");
    let hosts_file = args.get_one::<PathBuf>("hosts-file");
    let urls = load_urls_from_source(url, hosts_file).map_err(|e| anyhow!(e))?;

    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format: {}", format_name))?;

    let options = collect_options_from_args(args, urls, quiet);
    debug!(
        "Collecting {} target(s), max pages {:?}, delay {:?}, concurrency {}",
        options.urls.len(),
        options.max_pages,
        options.delay,
        options.concurrency
    );

    if !quiet {
        eprintln!(
            "{} Collecting from {} sitemap index(es)",
            "→".blue(),
            options.urls.len().to_string().bright_white()
        );
        match options.max_pages {
            Some(max) => eprintln!("{} Page limit: {}", "→".blue(), max),
            None => eprintln!("{} Page limit: none", "→".blue()),
        }
        eprintln!();
    }

    let progress_callback: Option<CollectProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            eprintln!("{} {}", "→".blue(), msg);
        }))
    };

    let collections = execute_collect(options, progress_callback, Some(cancel))
        .await
        .map_err(|e| anyhow!(e))?;

    let report = generate_report(&collections, format).context("Failed to render report")?;

    match args.get_one::<String>("output") {
        Some(output) => {
            let expanded = shellexpand::tilde(output);
            let path = Path::new(expanded.as_ref());
            save_report(&report, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    if !quiet {
        eprintln!();
        eprintln!("{}", "SUMMARY".bright_blue().bold());
        for collection in &collections {
            let marker = if collection.index_error.is_some() {
                "✗".red().bold()
            } else {
                "✓".green().bold()
            };
            eprintln!("  {} {}", marker, summarize_collection(collection));
        }
    }

    Ok(())
}
