//! Configuration management.
//!
//! Settings come from three layers: built-in defaults, an optional TOML
//! file (`--config`, `./contact-audit.toml` or the platform config
//! directory) and `CONTACT_AUDIT_*` environment variables. The bare
//! `API_TOKEN` variable is honored as the credential source for drop-in
//! compatibility with the original export scripts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Export run settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Retry and throttling settings
    #[serde(default)]
    pub pacing: PacingConfig,
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API credential; absence is a fatal startup condition
    #[serde(default = "default_token")]
    pub token: Option<String>,

    /// Base URL of the CRM API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_token() -> Option<String> {
    std::env::var("API_TOKEN")
        .or_else(|_| std::env::var("CONTACT_AUDIT_API_TOKEN"))
        .ok()
}

fn default_base_url() -> String {
    "https://api.clint.digital/v1/".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Export run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Pages to fetch in paginated mode
    #[serde(default = "default_total_pages")]
    pub total_pages: usize,

    /// Records per page in paginated mode
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Record limit for single-shot mode
    #[serde(default = "default_single_limit")]
    pub single_limit: usize,

    /// Directory receiving the output files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            total_pages: default_total_pages(),
            page_size: default_page_size(),
            single_limit: default_single_limit(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_total_pages() -> usize {
    10
}

fn default_page_size() -> usize {
    100
}

fn default_single_limit() -> usize {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Retry and throttling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Attempts per page fetch, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base retry delay in milliseconds; attempt `n` waits `n` times this
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Pause between page fetches in milliseconds (0 disables)
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    2000
}

fn default_page_delay_ms() -> u64 {
    500
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix("CONTACT_AUDIT")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(env_source())
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the conventional locations
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("contact-audit.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("contact-audit").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Get the configuration without a file: environment variables over defaults
pub fn get_config() -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder().add_source(env_source()).build()?;

    settings.try_deserialize()
}
