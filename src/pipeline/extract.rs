// src/pipeline/extract.rs

//! Extraction from a local HTML file, without fetching.

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::models::{Config, ExtractionResult, RawDocument};
use crate::services::Extractor;

/// Read `path` and extract its five categories.
pub async fn run_extract_file(
    config: &Config,
    path: &Path,
    cancel: &CancellationToken,
) -> Result<ExtractionResult> {
    let body = tokio::fs::read(path).await?;
    log::info!("Read {} ({} bytes)", path.display(), body.len());

    let raw = RawDocument::from_bytes(path.display().to_string(), body);
    let result = Extractor::new(&config.extractor).extract(raw, cancel).await?;
    Ok(result)
}
