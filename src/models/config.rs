// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP fetching behavior
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Concurrent extraction settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Multi-URL runs
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from `path`, or use defaults when no file exists.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_if_present(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.fetcher.max_body_bytes == 0 {
            return Err(AppError::validation("fetcher.max_body_bytes must be > 0"));
        }
        if self.extractor.cancel_check_interval == 0 {
            return Err(AppError::validation(
                "extractor.cancel_check_interval must be > 0",
            ));
        }
        if self.pipeline.max_concurrent == 0 {
            return Err(AppError::validation("pipeline.max_concurrent must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Largest body accepted, in bytes
    #[serde(default = "defaults::max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_body_bytes: defaults::max_body_bytes(),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Nodes visited between cancellation checks in each collection task
    #[serde(default = "defaults::cancel_check_interval")]
    pub cancel_check_interval: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            cancel_check_interval: defaults::cancel_check_interval(),
        }
    }
}

/// Settings for scraping several URLs in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum pages scraped at the same time
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level (overridden by `RUST_LOG`)
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; headline/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_body_bytes() -> usize {
        10 * 1024 * 1024
    }

    // Extractor defaults
    pub fn cancel_check_interval() -> usize {
        256
    }

    // Pipeline defaults
    pub fn max_concurrent() -> usize {
        4
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
