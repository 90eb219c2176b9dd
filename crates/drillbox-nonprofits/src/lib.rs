//! ProPublica Nonprofit Explorer ETL
//!
//! Pages through the search API with a bounded retry per page, keeps
//! organizations with a known city, and writes them to a JSON file.

pub mod config;
pub mod extract;
pub mod load;
pub mod runner;
pub mod source;
pub mod transform;

pub use config::{Config, ExtractConfig};
pub use extract::{Extraction, Extractor, Record, StopReason, extract};
pub use load::load;
pub use runner::{Summary, run, run_with_source};
pub use source::{HttpPageSource, PageSource};
pub use transform::{Transformed, transform};
