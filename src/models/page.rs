// src/models/page.rs

//! Raw page bytes as returned by the fetcher.

use chrono::{DateTime, Utc};

/// An unparsed page body and the metadata needed to decode it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL (after redirects) or file path the body came from
    pub source: String,

    /// `Content-Type` header value, if the server sent one
    pub content_type: Option<String>,

    /// Body bytes, untouched
    pub body: Vec<u8>,

    /// When the body was retrieved
    pub fetched_at: DateTime<Utc>,
}

impl RawDocument {
    /// Wrap bytes that did not come over HTTP (local files, tests).
    pub fn from_bytes(source: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            source: source.into(),
            content_type: None,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Charset parameter of the `Content-Type` header, lowercased.
    pub fn charset(&self) -> Option<String> {
        let content_type = self.content_type.as_deref()?;
        content_type
            .split(';')
            .skip(1)
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
            .map(|(_, value)| value.trim().trim_matches('"').to_ascii_lowercase())
    }
}
