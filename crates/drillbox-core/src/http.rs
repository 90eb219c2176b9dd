//! Blocking HTTP helpers over a shared async client.
//!
//! Uses async reqwest internally but presents a sync interface, so batch
//! code (extractor, reprocessing) stays plain sequential Rust. The same
//! runtime also hosts the roster server.

use std::sync::{LazyLock, RwLock};
use std::time::Duration;

use serde::Serialize;

use crate::error::FetchError;

/// Connect timeout (per-request timeouts come from the caller)
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Process-wide HTTP settings, set once from config/CLI at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request timeout (whole request, body included)
    pub timeout: Duration,
    /// Attempts per request before giving up on transport errors
    pub max_retries: u32,
    /// Fixed wait between attempts
    pub retry_delay: Duration,
}

impl HttpConfig {
    pub const DEFAULT: Self = Self {
        timeout: Duration::from_secs(5),
        max_retries: 3,
        retry_delay: Duration::from_secs(1),
    };
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static HTTP_CONFIG: RwLock<HttpConfig> = RwLock::new(HttpConfig::DEFAULT);

/// Replace the global HTTP settings.
pub fn set_http_config(config: HttpConfig) {
    let mut guard = HTTP_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *guard = config;
}

/// Current global HTTP settings.
pub fn http_config() -> HttpConfig {
    *HTTP_CONFIG.read().unwrap_or_else(|e| e.into_inner())
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("drillbox/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(4)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Fully-read HTTP response. Any status, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

async fn read_response(request: reqwest::RequestBuilder) -> Result<HttpResponse, FetchError> {
    let response = request.send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok(HttpResponse { status, body })
}

/// Blocking GET. Non-success statuses are returned, not turned into errors.
///
/// Must not be called from inside [`SHARED_RUNTIME`] worker threads.
pub fn get(url: &str, timeout: Duration) -> Result<HttpResponse, FetchError> {
    let request = SHARED_CLIENT.get(url).timeout(timeout);
    SHARED_RUNTIME.handle().block_on(read_response(request))
}

/// Blocking POST with a JSON body. Same status semantics as [`get`].
pub fn post_json<T: Serialize + ?Sized>(
    url: &str,
    body: &T,
    timeout: Duration,
) -> Result<HttpResponse, FetchError> {
    let request = SHARED_CLIENT.post(url).json(body).timeout(timeout);
    SHARED_RUNTIME.handle().block_on(read_response(request))
}
