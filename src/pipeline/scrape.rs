// src/pipeline/scrape.rs

//! Multi-URL scraping pipeline.
//!
//! Every URL is an independent single-page scrape. Pages run concurrently up
//! to `pipeline.max_concurrent`; reports come back in input order.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::{Config, ScrapeReport};
use crate::services::{CategoryCollector, PageFetcher, PageScraper};

/// Run the scraper over every URL with the configured HTTP stack.
pub async fn run_scrape(
    config: &Config,
    urls: &[String],
    cancel: &CancellationToken,
) -> Result<Vec<ScrapeReport>> {
    let scraper = PageScraper::new(config)?;
    Ok(scrape_all(&scraper, urls, config.pipeline.max_concurrent, cancel).await)
}

/// Scrape each URL with `scraper`, collecting one report per URL.
pub async fn scrape_all<F: PageFetcher, C: CategoryCollector>(
    scraper: &PageScraper<F, C>,
    urls: &[String],
    max_concurrent: usize,
    cancel: &CancellationToken,
) -> Vec<ScrapeReport> {
    log::info!("Scraping {} page(s)", urls.len());

    let reports: Vec<ScrapeReport> = stream::iter(urls)
        .map(|url| async move {
            let started = Instant::now();
            let outcome = scraper.scrape_page(url, cancel).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(page) => ScrapeReport::success(url.as_str(), elapsed_ms, page),
                Err(error) => {
                    log::warn!("Failed to scrape {}: {}", url, error);
                    ScrapeReport::failure(url.as_str(), elapsed_ms, error)
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let failures = reports.iter().filter(|r| !r.is_success()).count();
    log::info!(
        "Scraped {} page(s): {} succeeded, {} failed",
        reports.len(),
        reports.len() - failures,
        failures
    );
    reports
}
