//! Etl subcommand - extract, filter and save nonprofit organizations

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use drillbox_core::SharedProgress;
use serde_json::Value;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct EtlArgs {
    /// Search URL; the page index is appended to it
    #[arg(long)]
    pub url: Option<String>,

    /// Output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Response field holding the items of a page
    #[arg(long)]
    pub field: Option<String>,

    /// Milliseconds to pause between pages
    #[arg(long)]
    pub page_delay_ms: Option<u64>,

    /// Number of filtered organizations to print (0 to skip the preview)
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

pub fn run(args: EtlArgs, config: &Config, progress: &SharedProgress) -> Result<()> {
    let mut etl = config.etl_config(&drillbox_core::http_config());
    if let Some(url) = args.url {
        etl.base_url = url;
    }
    if let Some(output) = args.output {
        etl.output_path = output;
    }
    if let Some(field) = args.field {
        etl.extract.collection_field = field;
    }
    if let Some(ms) = args.page_delay_ms {
        etl.extract.page_delay = std::time::Duration::from_millis(ms);
    }

    let pb = progress.stage_line("extract");
    let summary = drillbox_nonprofits::run(&etl, pb)?;

    if args.preview > 0 {
        match &summary.first_raw {
            Some(raw) => println!("First raw record:\n{}", pretty(raw)?),
            None => println!("No raw data received."),
        }
        for org in summary.records.iter().take(args.preview) {
            println!("{}", pretty(org)?);
        }
    }

    let mut table = super::table(["Metric", "Value"]);
    table.add_row(vec!["Pages", &summary.pages.to_string()]);
    table.add_row(vec!["Fetch attempts", &summary.attempts.to_string()]);
    table.add_row(vec!["Stopped on", &summary.stop.to_string()]);
    table.add_row(vec!["Extracted", &summary.fetched.to_string()]);
    table.add_row(vec!["Kept (with city)", &summary.kept.to_string()]);
    table.add_row(vec![
        "Mean income",
        &format!("{:.2} $", summary.mean_income),
    ]);
    table.add_row(vec!["Output", &summary.output.display().to_string()]);
    table.add_row(vec![
        "Elapsed",
        &format!("{:.1}s", summary.elapsed.as_secs_f64()),
    ]);
    progress.println(format!("\n{table}"));

    Ok(())
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).context("Cannot format record")
}
