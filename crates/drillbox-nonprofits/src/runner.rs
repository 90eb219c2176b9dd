//! Main runner: extract → transform → load

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::ProgressBar;

use crate::config::Config;
use crate::extract::{Extractor, Record, StopReason};
use crate::load::load;
use crate::source::{HttpPageSource, PageSource};
use crate::transform::transform;

/// Pipeline execution summary
#[derive(Debug)]
pub struct Summary {
    pub pages: u32,
    pub attempts: u32,
    pub stop: StopReason,
    /// Raw records extracted
    pub fetched: usize,
    /// Records written after filtering
    pub kept: usize,
    pub mean_income: f64,
    pub output: PathBuf,
    pub elapsed: Duration,
    /// First raw record, for a quick look at the source shape
    pub first_raw: Option<Record>,
    /// Filtered records as written
    pub records: Vec<Record>,
}

/// Run the pipeline against the live API.
pub fn run(config: &Config, pb: ProgressBar) -> Result<Summary> {
    run_with_source(HttpPageSource::new(&config.base_url), config, pb)
}

/// Run the pipeline against any page source.
///
/// Extraction never fails; only writing the output can.
pub fn run_with_source<S: PageSource>(
    source: S,
    config: &Config,
    pb: ProgressBar,
) -> Result<Summary> {
    let start = Instant::now();

    let extraction = Extractor::new(source, config.extract.clone())
        .with_progress(pb)
        .run();
    let fetched = extraction.records.len();
    let first_raw = extraction.records.first().cloned();
    if first_raw.is_none() {
        log::warn!("No raw data received");
    }

    let transformed = transform(extraction.records);
    load(&transformed.kept, &config.output_path)?;

    Ok(Summary {
        pages: extraction.pages,
        attempts: extraction.attempts,
        stop: extraction.stop,
        fetched,
        kept: transformed.kept.len(),
        mean_income: transformed.mean_income,
        output: config.output_path.clone(),
        elapsed: start.elapsed(),
        first_raw,
        records: transformed.kept,
    })
}

#[cfg(test)]
mod tests {
    use drillbox_core::{FetchError, HttpResponse};
    use serde_json::{Value, json};
    use tempfile::TempDir;

    use super::*;
    use crate::config::ExtractConfig;

    /// Two pages, then a 404
    struct TwoPages;

    impl PageSource for TwoPages {
        fn fetch(&mut self, page: u32, _timeout: Duration) -> Result<HttpResponse, FetchError> {
            let body = match page {
                0 => json!({ "organizations": [
                    { "name": "Chat Noir", "city": "PARIS", "income_amount": 200 },
                    { "name": "Chat Perdu", "city": null, "income_amount": 5 },
                ]}),
                1 => json!({ "organizations": [
                    { "name": "Chat Botte", "city": "LILLE", "income_amount": 100 },
                ]}),
                _ => {
                    return Ok(HttpResponse {
                        status: 404,
                        body: String::new(),
                    });
                }
            };
            Ok(HttpResponse {
                status: 200,
                body: body.to_string(),
            })
        }
    }

    #[test]
    fn runs_all_stages() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            base_url: "unused".to_string(),
            output_path: dir.path().join("filtered.json"),
            extract: ExtractConfig {
                page_delay: Duration::ZERO,
                retry_delay: Duration::ZERO,
                ..ExtractConfig::default()
            },
        };

        let summary = run_with_source(TwoPages, &config, ProgressBar::hidden()).unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.attempts, 3);
        assert_eq!(summary.stop, StopReason::HttpError { status: 404 });
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.kept, 2);
        assert_eq!(summary.mean_income, 150.0);
        assert_eq!(summary.first_raw.unwrap()["name"], "Chat Noir");

        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&summary.output).unwrap()).unwrap();
        assert_eq!(written, summary.records);
        assert_eq!(written[1]["name"], "Chat Botte");
    }
}
