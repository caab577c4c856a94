// src/services/pages.rs

//! Single-page scraping service.
//!
//! Composes the fetcher and the extractor: fetch one URL, parse it, extract
//! the five categories and the page metadata. Each call is independent; nothing is shared between
//! calls except the HTTP client's connection pool.

use tokio_util::sync::CancellationToken;

use crate::error::{ExtractError, Result};
use crate::models::{Config, ExtractionResult, ScrapeRequest, ScrapedPage};
use crate::services::collector::{CategoryCollector, TagCollector};
use crate::services::extractor::Extractor;
use crate::services::fetcher::{HttpFetcher, PageFetcher};
use crate::utils::get_domain;

/// Fetches a page and extracts its text.
pub struct PageScraper<F = HttpFetcher, C = TagCollector> {
    fetcher: F,
    extractor: Extractor<C>,
}

impl PageScraper<HttpFetcher, TagCollector> {
    /// Create a scraper with the HTTP fetcher and tag collector.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_parts(
            HttpFetcher::new(&config.fetcher)?,
            Extractor::new(&config.extractor),
        ))
    }
}

impl<F: PageFetcher, C: CategoryCollector> PageScraper<F, C> {
    /// Assemble a scraper from its parts.
    pub fn with_parts(fetcher: F, extractor: Extractor<C>) -> Self {
        Self { fetcher, extractor }
    }

    /// Fetch `url` and extract all five categories.
    pub async fn scrape(&self, url: &str, cancel: &CancellationToken) -> Result<ExtractionResult> {
        Ok(self.scrape_page(url, cancel).await?.data)
    }

    /// Fetch `url` and read everything the page offers.
    pub async fn scrape_page(&self, url: &str, cancel: &CancellationToken) -> Result<ScrapedPage> {
        log::debug!(
            "Fetching {} (host {})",
            url,
            get_domain(url).as_deref().unwrap_or("?")
        );
        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ExtractError::Cancelled.into()),
            fetched = self.fetcher.fetch(url) => fetched?,
        };

        let source = raw.source.clone();
        let fetched_at = raw.fetched_at;
        let (metadata, result) = self.extractor.extract_page(raw, cancel).await?;
        log::info!(
            "Extracted {} entries from {} (h1={}, h2={}, h3={}, p={}, a={})",
            result.total(),
            url,
            result.h1.len(),
            result.h2.len(),
            result.h3.len(),
            result.paragraphs.len(),
            result.anchors.len()
        );
        Ok(ScrapedPage {
            source,
            fetched_at,
            metadata,
            data: result,
        })
    }

    /// Handle an inbound `{"url": ...}` request.
    pub async fn handle(
        &self,
        request: &ScrapeRequest,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        self.scrape(&request.url, cancel).await
    }
}
