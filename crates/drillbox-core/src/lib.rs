//! Drillbox Core - Shared infrastructure for the drillbox exercises
//!
//! HTTP client and runtime bridge, network error taxonomy, logging and
//! progress reporting used by the extraction pipeline and the roster tools.

pub mod error;
pub mod http;
pub mod json;
pub mod logging;
pub mod progress;

// Re-exports for convenience
pub use error::FetchError;
pub use http::{
    HttpConfig, HttpResponse, SHARED_RUNTIME, get, http_client, http_config, post_json,
    set_http_config,
};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress};
