// src/lib.rs

//! headline: single-page h1/h2/h3, paragraph and anchor text extractor

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

pub use error::{AppError, ExtractError, FetchError, ParseError, Result};
pub use models::{
    Category, Document, ExtractionResult, PageMetadata, RawDocument, ScrapeRequest, ScrapedPage,
};
pub use services::{Extractor, HttpFetcher, PageFetcher, PageScraper, extract};
