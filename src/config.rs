//! Scraper configuration
//!
//! Defaults match a polite single-threaded crawl. Environment variables
//! override defaults, CLI flags override both.
//!
//! - `HERITAGE_CSV_PATH`: CSV store location (default: `heritage_import.csv`)
//! - `HERITAGE_DELAY_MS`: pause before every request (default: 500)
//! - `HERITAGE_TIMEOUT_MS`: per-request timeout (default: 30000)
//! - `HERITAGE_MAX_RETRIES`: retries on transient HTTP failures (default: 3)

use crate::error::{Error, Result};
use crate::sink::DEFAULT_CSV_PATH;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Browser-like user agent; the memorial site rejects obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for a scraping run
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// CSV store location
    pub csv_path: PathBuf,
    /// Pause before every request in milliseconds (default: 500)
    pub polite_delay_ms: u64,
    /// Request timeout in milliseconds (default: 30000)
    pub timeout_ms: u64,
    /// Retries on 429/5xx and transport errors (default: 3)
    pub max_retries: u32,
    /// First backoff step in milliseconds, doubled per retry (default: 1000)
    pub backoff_base_ms: u64,
    /// User agent header
    pub user_agent: String,
    /// Accept-Language header (default: Hebrew first)
    pub accept_language: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            polite_delay_ms: 500,
            timeout_ms: 30000,
            max_retries: 3,
            backoff_base_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "he,en;q=0.9".to_string(),
        }
    }
}

fn env_number<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(None),
    }
}

impl ScraperConfig {
    /// Create a new config builder
    pub fn builder() -> ScraperConfigBuilder {
        ScraperConfigBuilder::default()
    }

    /// Defaults overlaid with `HERITAGE_*` environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(path) = env::var("HERITAGE_CSV_PATH") {
            if !path.trim().is_empty() {
                config.csv_path = PathBuf::from(path);
            }
        }
        if let Some(delay) = env_number("HERITAGE_DELAY_MS")? {
            config.polite_delay_ms = delay;
        }
        if let Some(timeout) = env_number("HERITAGE_TIMEOUT_MS")? {
            config.timeout_ms = timeout;
        }
        if let Some(retries) = env_number("HERITAGE_MAX_RETRIES")? {
            config.max_retries = retries;
        }
        Ok(config)
    }
}

/// Builder for ScraperConfig
#[derive(Default)]
pub struct ScraperConfigBuilder {
    config: ScraperConfig,
}

impl ScraperConfigBuilder {
    /// Start from an existing config
    pub fn from_config(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Set the CSV store location
    pub fn csv_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.csv_path = path.into();
        self
    }

    /// Set the polite delay
    pub fn polite_delay_ms(mut self, ms: u64) -> Self {
        self.config.polite_delay_ms = ms;
        self
    }

    /// Set the request timeout
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Set the retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the first backoff step
    pub fn backoff_base_ms(mut self, ms: u64) -> Self {
        self.config.backoff_base_ms = ms;
        self
    }

    /// Set user agent
    pub fn user_agent<S: Into<String>>(mut self, ua: S) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Set Accept-Language
    pub fn accept_language<S: Into<String>>(mut self, lang: S) -> Self {
        self.config.accept_language = lang.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ScraperConfig {
        self.config
    }
}
