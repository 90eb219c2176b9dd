//! drillbox - ETL and webhook exercises from one binary
//!
//! Extracts the ProPublica nonprofit search into JSON, runs the character
//! webhook service, and replays its journal against the processing endpoint.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "drillbox")]
#[command(about = "ETL and webhook exercises")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./drillbox.toml or ~/.config/drillbox/config.toml)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Attempts per request before giving up on network errors
    #[arg(long, global = true)]
    max_retries: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract, filter and save nonprofit organizations
    Etl(cmd::etl::EtlArgs),
    /// Run the webhook / roster HTTP service
    Serve(cmd::serve::ServeArgs),
    /// Replay the webhook journal against the processing endpoint
    Reprocess(cmd::reprocess::ReprocessArgs),
    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let progress = Arc::new(drillbox_core::ProgressContext::new());

    // TTY: route logs through the spinner; non-TTY: plain lines
    let multi = if progress.is_tty() {
        Some(progress.multi())
    } else {
        None
    };
    drillbox_core::init_logging(false, cli.debug, multi);

    let config = if let Some(path) = cli.config {
        Config::from_file(&path)?
    } else {
        Config::load()?
    };

    let http_config = config.http_config(cli.timeout, cli.max_retries);
    drillbox_core::set_http_config(http_config);

    match cli.command {
        Command::Etl(args) => cmd::etl::run(args, &config, &progress),
        Command::Serve(args) => cmd::serve::run(args, &config),
        Command::Reprocess(args) => cmd::reprocess::run(args, &config),
        Command::Config => {
            cmd::show_config(&config);
            Ok(())
        }
    }
}
