//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use drillbox_core::HttpConfig;
use serde::Deserialize;

/// Environment variable consulted when no API token is configured
const API_TOKEN_ENV: &str = "DRILLBOX_API_TOKEN";

/// Global configuration for drillbox
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpSection,
    pub etl: EtlSection,
    pub server: ServerSection,
    pub reprocess: ReprocessSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    /// Per-request timeout in seconds
    pub timeout: u64,
    /// Attempts per request
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout: HttpConfig::DEFAULT.timeout.as_secs(),
            max_retries: HttpConfig::DEFAULT.max_retries,
            retry_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EtlSection {
    pub base_url: String,
    pub output: PathBuf,
    pub collection_field: String,
    pub page_delay_ms: u64,
}

impl Default for EtlSection {
    fn default() -> Self {
        let defaults = drillbox_nonprofits::Config::default();
        Self {
            base_url: defaults.base_url,
            output: defaults.output_path,
            collection_field: defaults.extract.collection_field,
            page_delay_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub log_file: PathBuf,
    pub notification_file: PathBuf,
    pub notify_url: Option<String>,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_token: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        let defaults = drillbox_roster::ServerConfig::default();
        Self {
            bind: defaults.bind,
            log_file: defaults.log_file,
            notification_file: defaults.notification_file,
            notify_url: defaults.notify_url,
            api_token: std::env::var(API_TOKEN_ENV).ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReprocessSection {
    pub log_file: PathBuf,
    pub endpoint: String,
}

impl Default for ReprocessSection {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("webhook_log.json"),
            endpoint: "http://localhost:8000/traitement".to_string(),
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./drillbox.toml (current directory)
    /// 2. ~/.config/drillbox/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("drillbox.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "drillbox") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// HTTP settings, with CLI overrides applied
    pub fn http_config(&self, timeout: Option<u64>, max_retries: Option<u32>) -> HttpConfig {
        HttpConfig {
            timeout: Duration::from_secs(timeout.unwrap_or(self.http.timeout)),
            max_retries: max_retries.unwrap_or(self.http.max_retries),
            retry_delay: Duration::from_millis(self.http.retry_delay_ms),
        }
    }

    /// ETL pipeline settings on top of the effective HTTP settings
    pub fn etl_config(&self, http: &HttpConfig) -> drillbox_nonprofits::Config {
        let mut extract = drillbox_nonprofits::ExtractConfig::from_http(http);
        extract.page_delay = Duration::from_millis(self.etl.page_delay_ms);
        extract.collection_field = self.etl.collection_field.clone();
        drillbox_nonprofits::Config {
            base_url: self.etl.base_url.clone(),
            output_path: self.etl.output.clone(),
            extract,
        }
    }

    pub fn server_config(&self) -> drillbox_roster::ServerConfig {
        drillbox_roster::ServerConfig {
            bind: self.server.bind.clone(),
            log_file: self.server.log_file.clone(),
            notification_file: self.server.notification_file.clone(),
            notify_url: self.server.notify_url.clone(),
            api_token: self.server.api_token.clone(),
        }
    }
}
