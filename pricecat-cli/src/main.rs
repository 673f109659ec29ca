//! pricecat CLI
//!
//! Validates product ids against the pricing service, writes the catalog
//! snapshot, and attaches an image to every catalog product.

mod cli_types;
mod commands;
mod error;
mod logging;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!(
            "{} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        );
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let quiet = cli.quiet;

    match cli.command {
        Commands::Validate {
            start,
            end,
            batch_size,
            request_delay_ms,
            batch_delay_ms,
            inspect_day,
            output,
        } => commands::validate::run_validate(
            commands::validate::ValidateArgs {
                start,
                end,
                batch_size,
                request_delay_ms,
                batch_delay_ms,
                inspect_day,
                output,
            },
            quiet,
        ),
        Commands::Enrich {
            snapshot,
            image_dir,
            limit,
            no_log,
        } => commands::enrich::run_enrich(snapshot, image_dir, limit, no_log, quiet),
        Commands::Retry {
            ids,
            items,
            missing,
            force,
            snapshot,
            image_dir,
            no_log,
        } => commands::enrich::run_retry(
            commands::enrich::RetryArgs {
                ids,
                items,
                missing,
                force,
                snapshot,
                image_dir,
                no_log,
            },
            quiet,
        ),
        Commands::Status {
            snapshot,
            image_dir,
        } => commands::status::run_status(snapshot, image_dir),
        Commands::Scan { image_dir, output } => commands::scan::run_scan(image_dir, output),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

/// Build the single-threaded runtime every networked command runs on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(format!("could not start async runtime: {}", e)))
}
