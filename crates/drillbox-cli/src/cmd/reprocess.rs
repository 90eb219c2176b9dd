//! Reprocess subcommand - replay the webhook journal

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use drillbox_roster::{HttpProcessor, Outcome};

use crate::config::Config;

#[derive(Args, Debug)]
pub struct ReprocessArgs {
    /// Journal to replay
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Processing endpoint receiving {nom, score}
    #[arg(long)]
    pub endpoint: Option<String>,
}

pub fn run(args: ReprocessArgs, config: &Config) -> Result<()> {
    let log_file = args
        .log_file
        .unwrap_or_else(|| config.reprocess.log_file.clone());
    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config.reprocess.endpoint.clone());

    let batch = drillbox_roster::load_batch(&log_file);
    let mut processor = HttpProcessor::new(endpoint, drillbox_core::http_config().timeout);
    let report = drillbox_roster::reprocess(batch, &mut processor);

    let mut table = super::table(["Character", "Result"]);
    for (name, outcome) in &report.outcomes {
        let result = match outcome {
            Outcome::Processed(scored) => format!("{} (score {})", scored.level, scored.score),
            Outcome::Rejected { status } => format!("error {status}"),
            Outcome::Failed(reason) => reason.clone(),
        };
        table.add_row(vec![name.as_str(), &result]);
    }
    eprintln!("\n{table}");
    log::info!(
        "{} processed, {} failed",
        report.processed(),
        report.failed()
    );

    Ok(())
}
