// src/models/mod.rs

//! Domain models for the extractor.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod document;
mod extraction;
mod metadata;
mod page;
mod report;

// Re-export all public types
pub use config::{Config, ExtractorConfig, FetcherConfig, LoggingConfig, PipelineConfig};
pub use document::{Document, Node, NodeKind};
pub use extraction::{Category, CategorySlots, ExtractionResult};
pub use metadata::PageMetadata;
pub use page::RawDocument;
pub use report::{ScrapeReport, ScrapeRequest, ScrapedPage};
