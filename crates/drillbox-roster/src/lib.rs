//! Character roster exercises
//!
//! Score classification, the webhook receiver and its companion routes,
//! the JSON journal they write, and the batch that replays the journal
//! against the processing endpoint.

pub mod journal;
pub mod level;
pub mod model;
pub mod reprocess;
pub mod server;

pub use journal::{Journal, read_characters};
pub use level::Level;
pub use model::{Character, ListedCharacter, ScoreReport, ScoredCharacter, static_roster};
pub use reprocess::{
    HttpProcessor, Outcome, Processor, Report, dedupe_by_name, load_batch, reprocess,
};
pub use server::{AppState, ServerConfig, router, serve};
