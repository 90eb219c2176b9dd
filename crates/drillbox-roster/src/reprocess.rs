//! Replay the webhook journal against the processing endpoint.
//!
//! Names are deduplicated first (last entry wins), then each character is
//! POSTed as `{nom, score}`. One bad record never stops the batch.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use drillbox_core::{FetchError, HttpResponse};

use crate::journal::read_characters;
use crate::model::{Character, ScoredCharacter};

/// Sends one character for processing
pub trait Processor {
    fn process(&mut self, character: &Character) -> Result<HttpResponse, FetchError>;
}

/// POSTs JSON to a processing endpoint such as `/traitement`
#[derive(Debug, Clone)]
pub struct HttpProcessor {
    endpoint: String,
    timeout: Duration,
}

impl HttpProcessor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl Processor for HttpProcessor {
    fn process(&mut self, character: &Character) -> Result<HttpResponse, FetchError> {
        drillbox_core::post_json(&self.endpoint, character, self.timeout)
    }
}

/// What happened to one character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Processed(ScoredCharacter),
    /// Endpoint answered with a non-200 status
    Rejected { status: u16 },
    /// Transport failure or unreadable answer
    Failed(String),
}

#[derive(Debug, Default)]
pub struct Report {
    /// One entry per unique name, in batch order
    pub outcomes: Vec<(String, Outcome)>,
}

impl Report {
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, Outcome::Processed(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.processed()
    }
}

/// Keep one record per name: the last one, at the position of the first.
pub fn dedupe_by_name(records: Vec<Character>) -> Vec<Character> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Character> = Vec::with_capacity(records.len());
    for record in records {
        match index.get(&record.name) {
            Some(&slot) => unique[slot] = record,
            None => {
                index.insert(record.name.clone(), unique.len());
                unique.push(record);
            }
        }
    }
    unique
}

/// Journal contents for replay.
///
/// A missing or non-array journal is an empty batch; a bad entry only drops itself.
pub fn load_batch(path: &Path) -> Vec<Character> {
    match read_characters(path) {
        Ok(characters) => characters,
        Err(e) => {
            log::error!("Cannot load journal: {e:#}");
            Vec::new()
        }
    }
}

pub fn reprocess<P: Processor + ?Sized>(characters: Vec<Character>, processor: &mut P) -> Report {
    let characters = dedupe_by_name(characters);
    log::info!("Processing {} character(s)...", characters.len());

    let mut report = Report::default();
    for character in characters {
        let outcome = match processor.process(&character) {
            Ok(resp) if resp.is_success() => {
                match serde_json::from_str::<ScoredCharacter>(&resp.body) {
                    Ok(scored) => {
                        log::info!(
                            "{} (score: {}) -> level: {}",
                            scored.name,
                            scored.score,
                            scored.level
                        );
                        Outcome::Processed(scored)
                    }
                    Err(e) => {
                        log::error!("{}: unreadable response: {e}", character.name);
                        Outcome::Failed(format!("unreadable response: {e}"))
                    }
                }
            }
            Ok(resp) => {
                log::error!("{}: error {}", character.name, resp.status);
                Outcome::Rejected {
                    status: resp.status,
                }
            }
            Err(e) => {
                log::error!("{}: {e}", character.name);
                Outcome::Failed(e.to_string())
            }
        };
        report.outcomes.push((character.name, outcome));
    }
    report
}
