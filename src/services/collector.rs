// src/services/collector.rs

//! Per-category text collection.
//!
//! A collector walks an already-parsed `Document` for one category and returns
//! the normalized text of every matching element in document order. The
//! extractor runs one collector call per category, each on its own thread.

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::models::{Category, Document, ExtractorConfig};
use crate::utils::normalize_text;

/// Why a collector stopped without output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// The cancellation token fired mid-walk
    #[error("stopped by cancellation")]
    Cancelled,

    /// The walk itself failed
    #[error("{0}")]
    Failed(String),
}

/// Collects the text of one category from a shared document.
pub trait CategoryCollector: Send + Sync + 'static {
    fn collect(
        &self,
        document: &Document,
        category: Category,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, CollectError>;
}

/// Default collector: matches elements by tag name.
#[derive(Debug, Clone)]
pub struct TagCollector {
    check_interval: usize,
}

impl TagCollector {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            check_interval: config.cancel_check_interval.max(1),
        }
    }
}

impl Default for TagCollector {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl CategoryCollector for TagCollector {
    fn collect(
        &self,
        document: &Document,
        category: Category,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>, CollectError> {
        let tag = category.tag();
        let mut texts = Vec::new();

        for (index, node) in document.nodes().iter().enumerate() {
            if index % self.check_interval == 0 && cancel.is_cancelled() {
                return Err(CollectError::Cancelled);
            }
            if node.is_element(tag) {
                // Empty strings are kept so output length matches element count.
                texts.push(normalize_text(&document.text_content(index)));
            }
        }

        Ok(texts)
    }
}
