use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitewalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitewalk")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner, progress and summary output").required(false))
        .arg(
            arg!(-v --"verbose" "Log every sitemap fetch (overridden by RUST_LOG)").required(false),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("collect")
                .about(
                    "Fetch a sitemap index, walk its child sitemaps and print the unique page \
                URLs they list.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The sitemap index URL")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of sitemap index URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM>)
                        .required(false)
                        .help("Stop after this many unique page URLs per index (default: no limit)")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(--"delay-ms" <MILLIS>)
                        .required(false)
                        .help("Pause between child sitemap requests, in milliseconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("500"),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("Child sitemaps fetched at once. Output order is unaffected.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("1"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds (at least 1)")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"user-agent" <AGENT>)
                        .required(false)
                        .help("User-Agent header sent with every request"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, csv, markdown")
                        .value_parser(["text", "json", "csv", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)"),
                ),
        )
}
