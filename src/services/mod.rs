// src/services/mod.rs

//! Service layer for the extractor.
//!
//! This module contains the business logic for:
//! - Page fetching (`HttpFetcher`)
//! - Per-category text collection (`TagCollector`)
//! - Concurrent extraction (`Extractor`)
//! - Fetch-then-extract for one URL (`PageScraper`)

pub mod collector;
pub mod extractor;
pub mod fetcher;
mod pages;

pub use collector::{CategoryCollector, CollectError, TagCollector};
pub use extractor::{Extractor, extract};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use pages::PageScraper;
