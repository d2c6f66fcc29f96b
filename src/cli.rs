use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "cardcap")]
#[command(about = "Market capitalization crawler for historical card sets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crawl the catalog and write fresh snapshots
    Crawl {
        /// Supply resolution mode: rarity (bulk fetch) or explicit (targeted fetch)
        #[arg(short, long, default_value = "rarity")]
        mode: String,

        /// Comma-separated subset of sets to crawl (e.g. "alpha,beta")
        #[arg(short, long)]
        sets: Option<String>,

        /// Path to the reference supply file
        #[arg(short, long)]
        prints_file: Option<PathBuf>,

        /// Directory the snapshots are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Per-request timeout in seconds
        #[arg(short, long)]
        timeout_secs: Option<u64>,
    },
    /// Show the current snapshot state
    Status {
        /// Directory the snapshots were written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            mode,
            sets,
            prints_file,
            output_dir,
            timeout_secs,
        } => {
            commands::crawl::run(mode, sets, prints_file, output_dir, timeout_secs);
        }
        Commands::Status { output_dir } => {
            commands::status::run(output_dir);
        }
    }
}
