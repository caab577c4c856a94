// src/services/fetcher.rs

//! Page fetcher service.
//!
//! Retrieves the raw bytes of a single page. One attempt per call; no retries
//! and no caching.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};

use crate::error::{FetchError, Result};
use crate::models::{FetcherConfig, RawDocument};
use crate::utils::http::create_async_client;
use crate::utils::parse_http_url;

/// Source of raw page bytes.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. Anything other than HTTP 200 is an error.
    async fn fetch(&self, url: &str) -> std::result::Result<RawDocument, FetchError>;
}

/// Fetcher backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher with a client built from the configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Ok(Self::from_client(client, config.max_body_bytes))
    }

    /// Create a fetcher around an existing client.
    pub fn from_client(client: Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<RawDocument, FetchError> {
        let target = parse_http_url(url)?;
        log::debug!("GET {}", target);

        let mut response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || FetchError::BodyTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };
        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(too_large());
            }
        }

        let source = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::transport(url, e))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        log::debug!("Fetched {} ({} bytes)", source, body.len());
        Ok(RawDocument {
            source,
            content_type,
            body,
            fetched_at: Utc::now(),
        })
    }
}
