//! Nonprofit pipeline configuration

use std::path::PathBuf;
use std::time::Duration;

use drillbox_core::HttpConfig;

/// Default search: organizations matching "chat", page index appended
pub const DEFAULT_BASE_URL: &str =
    "https://projects.propublica.org/nonprofits/api/v2/search.json?q=chat&page=";

/// Knobs for one extraction run
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Fetch attempts per page (not additional retries)
    pub max_retries: u32,
    /// Per-request timeout
    pub timeout: Duration,
    /// Wait after a transport failure before the next attempt
    pub retry_delay: Duration,
    /// Politeness pause between successful pages
    pub page_delay: Duration,
    /// Response field holding the page's items
    pub collection_field: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::from_http(&HttpConfig::DEFAULT)
    }
}

impl ExtractConfig {
    /// Take timeout and retry settings from the process-wide HTTP config
    pub fn from_http(http: &HttpConfig) -> Self {
        Self {
            max_retries: http.max_retries,
            timeout: http.timeout,
            retry_delay: http.retry_delay,
            page_delay: Duration::from_millis(500),
            collection_field: "organizations".to_string(),
        }
    }
}

/// Runtime configuration for the whole extract → transform → load run
#[derive(Debug, Clone)]
pub struct Config {
    /// Page index is appended verbatim to this URL
    pub base_url: String,
    /// Where the filtered organizations are written
    pub output_path: PathBuf,
    pub extract: ExtractConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_path: PathBuf::from("donnees_filtrees_chat.json"),
            extract: ExtractConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.base_url.starts_with("https://"));
        assert!(config.base_url.ends_with("page="));
        assert_eq!(config.extract.max_retries, 3);
        assert_eq!(config.extract.timeout, Duration::from_secs(5));
        assert_eq!(config.extract.retry_delay, Duration::from_secs(1));
        assert_eq!(config.extract.page_delay, Duration::from_millis(500));
        assert_eq!(config.extract.collection_field, "organizations");
    }

    #[test]
    fn from_http_overrides_retry_settings() {
        let http = HttpConfig {
            timeout: Duration::from_secs(30),
            max_retries: 1,
            retry_delay: Duration::ZERO,
        };
        let extract = ExtractConfig::from_http(&http);
        assert_eq!(extract.max_retries, 1);
        assert_eq!(extract.timeout, Duration::from_secs(30));
        assert_eq!(extract.retry_delay, Duration::ZERO);
        assert_eq!(extract.page_delay, Duration::from_millis(500));
    }
}
