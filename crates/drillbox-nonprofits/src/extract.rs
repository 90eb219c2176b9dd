//! Paginated extraction with a bounded per-page retry.
//!
//! Pages are fetched one at a time from index 0 until the collection field
//! comes back empty. Transport failures are retried with a fixed delay;
//! a non-200 status ends the run at once. Every terminal path returns the
//! records accumulated so far, never an error.
//!
//! ```text
//!             ┌──────── retry_delay ────────┐
//!             v                             │
//!   ──> Fetching ──transport error──> Retrying ──attempts used / unretryable──> Exhausted
//!        │   ^
//!        │   └────────── page_delay ──────────┐
//!        ├──200──> Success ──items──> (append, page += 1)
//!        │            ├──empty──> EndOfData
//!        │            └──bad body──> Malformed
//!        └──non-200──> HttpError
//! ```

use std::time::Duration;

use drillbox_core::FetchError;
use indicatif::ProgressBar;
use serde_json::Value;

use crate::config::ExtractConfig;
use crate::source::{HttpPageSource, PageSource};

/// One raw item from the remote collection, kept opaque
pub type Record = Value;

/// Why an extraction run stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// A successful page had an empty collection
    EndOfData,
    /// A page answered with a non-200 status; not retried
    HttpError { status: u16 },
    /// Every attempt on a page failed at the transport level, or the
    /// request could not be built at all
    Exhausted,
    /// A 200 body that was not JSON or lacked a usable collection field
    Malformed { reason: String },
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfData => write!(f, "end of data"),
            Self::HttpError { status } => write!(f, "HTTP {status}"),
            Self::Exhausted => write!(f, "retries exhausted"),
            Self::Malformed { reason } => write!(f, "malformed response: {reason}"),
        }
    }
}

/// Result of one extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Items of every successful page, in page order
    pub records: Vec<Record>,
    /// Number of non-empty pages appended
    pub pages: u32,
    /// Total fetch attempts, retries included
    pub attempts: u32,
    pub stop: StopReason,
}

#[derive(Debug)]
enum State {
    Fetching { attempt: u32 },
    Retrying { attempt: u32, error: FetchError },
    Success { body: String },
    Exhausted,
    HttpError { status: u16 },
    EndOfData,
    Malformed { reason: String },
}

impl State {
    fn into_stop(self) -> Result<StopReason, Self> {
        match self {
            Self::Exhausted => Ok(StopReason::Exhausted),
            Self::HttpError { status } => Ok(StopReason::HttpError { status }),
            Self::EndOfData => Ok(StopReason::EndOfData),
            Self::Malformed { reason } => Ok(StopReason::Malformed { reason }),
            other => Err(other),
        }
    }
}

/// Drives a [`PageSource`] from page 0 to a terminal state.
pub struct Extractor<S> {
    source: S,
    config: ExtractConfig,
    pb: ProgressBar,
    records: Vec<Record>,
    page: u32,
    attempts: u32,
}

impl<S: PageSource> Extractor<S> {
    pub fn new(source: S, config: ExtractConfig) -> Self {
        Self {
            source,
            config,
            pb: ProgressBar::hidden(),
            records: Vec::new(),
            page: 0,
            attempts: 0,
        }
    }

    /// Report page and retry status on this bar.
    pub fn with_progress(mut self, pb: ProgressBar) -> Self {
        self.pb = pb;
        self
    }

    /// Run to completion.
    pub fn run(mut self) -> Extraction {
        let mut state = State::Fetching { attempt: 1 };
        let stop = loop {
            state = match state.into_stop() {
                Ok(stop) => break stop,
                Err(live) => self.step(live),
            };
        };

        match &stop {
            StopReason::EndOfData => log::info!("No more results after page {}", self.page),
            StopReason::HttpError { status } => {
                log::error!("Page {}: HTTP {status}, stopping", self.page)
            }
            StopReason::Exhausted => log::error!(
                "Page {}: giving up after {} attempts",
                self.page,
                self.config.max_retries
            ),
            StopReason::Malformed { reason } => {
                log::error!("Page {}: {reason}, stopping", self.page)
            }
        }
        self.pb
            .finish_with_message(format!("{} records ({stop})", self.records.len()));

        Extraction {
            records: self.records,
            pages: self.page,
            attempts: self.attempts,
            stop,
        }
    }

    fn step(&mut self, state: State) -> State {
        match state {
            State::Fetching { attempt } if attempt > self.config.max_retries => State::Exhausted,
            State::Fetching { attempt } => {
                if attempt == 1 {
                    log::info!("Extracting page {}...", self.page);
                }
                self.pb.set_message(format!(
                    "page {} ({} records)",
                    self.page,
                    self.records.len()
                ));
                self.attempts += 1;
                match self.source.fetch(self.page, self.config.timeout) {
                    Ok(resp) if resp.is_success() => State::Success { body: resp.body },
                    Ok(resp) => State::HttpError {
                        status: resp.status,
                    },
                    Err(error) => State::Retrying { attempt, error },
                }
            }
            State::Retrying { attempt, error } => {
                let max = self.config.max_retries;
                log::warn!("Page {}: attempt {attempt}/{max} failed: {error}", self.page);
                if attempt >= max || !error.is_retryable() {
                    return State::Exhausted;
                }
                self.pb
                    .set_message(format!("page {}: retry {attempt}/{max}...", self.page));
                pause(self.config.retry_delay);
                State::Fetching {
                    attempt: attempt + 1,
                }
            }
            State::Success { body } => {
                match collection_items(&body, &self.config.collection_field) {
                    Err(reason) => State::Malformed { reason },
                    Ok(items) if items.is_empty() => State::EndOfData,
                    Ok(items) => {
                        log::debug!("Page {}: {} items", self.page, items.len());
                        self.records.extend(items);
                        self.page += 1;
                        pause(self.config.page_delay);
                        State::Fetching { attempt: 1 }
                    }
                }
            }
            terminal => terminal,
        }
    }
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

/// Pull the collection out of a response body. `null` counts as empty.
fn collection_items(body: &str, field: &str) -> Result<Vec<Record>, String> {
    let mut parsed: Value =
        serde_json::from_str(body).map_err(|e| format!("invalid JSON: {e}"))?;
    match parsed.get_mut(field).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) => Ok(Vec::new()),
        Some(other) => Err(format!("'{field}' is not an array (got {other})")),
        None => Err(format!("no '{field}' field in response")),
    }
}

/// Extract every page from `<base_url><page>` over HTTP.
pub fn extract(base_url: &str, config: &ExtractConfig) -> Extraction {
    Extractor::new(HttpPageSource::new(base_url), config.clone()).run()
}
