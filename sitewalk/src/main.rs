use colored::Colorize;
use commands::command_argument_builder;
use sitewalk::handlers::{handle_collect, print_banner, setup_logging};
use sitewalk_scanner::CancellationToken;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    setup_logging(if verbose { "debug" } else { "warn" });

    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("collect", primary_command)) => {
            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    ctrl_c.cancel();
                }
            });

            if let Err(e) = handle_collect(primary_command, quiet, &cancel).await {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
