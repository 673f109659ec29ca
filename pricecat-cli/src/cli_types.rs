//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pricecat")]
#[command(about = "Build a priced product catalog and fetch product images", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Validate a range of product ids against the pricing service
    Validate {
        /// First id to check
        #[arg(long)]
        start: Option<u32>,

        /// Last id to check (inclusive)
        #[arg(long)]
        end: Option<u32>,

        /// Ids per batch
        #[arg(long)]
        batch_size: Option<u32>,

        /// Pause between ids within a batch, in milliseconds
        #[arg(long)]
        request_delay_ms: Option<u64>,

        /// Pause between batches, in milliseconds
        #[arg(long)]
        batch_delay_ms: Option<u64>,

        /// Price survey date (YYYYMMDD)
        #[arg(long)]
        inspect_day: Option<String>,

        /// Snapshot file to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download an image for every product in the snapshot
    Enrich {
        /// Snapshot file to read
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Directory to store images in
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Process at most this many products
        #[arg(short, long)]
        limit: Option<usize>,

        /// Disable the enrichment log file
        #[arg(long)]
        no_log: bool,
    },

    /// Retry image downloads for specific products with a wider search
    Retry {
        /// Product ids to look up in the snapshot (e.g., 12,57,301)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u32>,

        /// Explicit product as ID=NAME (repeatable)
        #[arg(long = "item", value_name = "ID=NAME")]
        items: Vec<String>,

        /// Retry every product in the snapshot that has no image yet
        #[arg(long)]
        missing: bool,

        /// Replace images that already exist
        #[arg(long)]
        force: bool,

        /// Snapshot file to read
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Directory to store images in
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Disable the enrichment log file
        #[arg(long)]
        no_log: bool,
    },

    /// Report products in the snapshot that have no image
    Status {
        /// Snapshot file to read
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Directory holding images
        #[arg(long)]
        image_dir: Option<PathBuf>,
    },

    /// Write a manifest of the images in the image directory
    Scan {
        /// Directory holding images
        #[arg(long)]
        image_dir: Option<PathBuf>,

        /// Manifest file to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and credentials
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings, credentials and their sources
    Show,

    /// Print the config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn retry_accepts_ids_and_items() {
        let cli = Cli::try_parse_from([
            "pricecat", "retry", "--ids", "3,9", "--item", "12=Fresh Milk", "--force",
        ])
        .unwrap();
        match cli.command {
            Commands::Retry {
                ids, items, force, ..
            } => {
                assert_eq!(ids, vec![3, 9]);
                assert_eq!(items, vec!["12=Fresh Milk".to_string()]);
                assert!(force);
            }
            _ => panic!("expected retry"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pricecat", "validate", "--end", "50", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }
}
