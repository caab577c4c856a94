// src/models/report.rs

//! Inbound request and per-URL outcome records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ExtractionResult, PageMetadata};

/// Inbound request body: `{"url": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Everything read from one successfully scraped page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    /// Final URL after redirects
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub metadata: PageMetadata,
    pub data: ExtractionResult,
}

/// Outcome of scraping one URL in a multi-URL run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// URL as given by the caller
    pub url: String,

    /// Wall time for fetch and extraction
    pub elapsed_ms: u64,

    /// When the body was received, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,

    /// Title and meta tags, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,

    /// Extracted text, on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractionResult>,

    /// Error message, on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeReport {
    /// Report for a page that was scraped.
    pub fn success(url: impl Into<String>, elapsed_ms: u64, page: ScrapedPage) -> Self {
        Self {
            url: url.into(),
            elapsed_ms,
            fetched_at: Some(page.fetched_at),
            metadata: Some(page.metadata),
            data: Some(page.data),
            error: None,
        }
    }

    /// Report for a page that could not be scraped.
    pub fn failure(url: impl Into<String>, elapsed_ms: u64, error: impl ToString) -> Self {
        Self {
            url: url.into(),
            elapsed_ms,
            fetched_at: None,
            metadata: None,
            data: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}
