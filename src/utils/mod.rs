// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::FetchError;

/// Parse a URL and require an absolute http or https URL.
pub fn parse_http_url(input: &str) -> Result<Url, FetchError> {
    let url = Url::parse(input.trim()).map_err(|e| FetchError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        "http" | "https" => Err(FetchError::InvalidUrl {
            url: input.to_string(),
            reason: "missing host".to_string(),
        }),
        other => Err(FetchError::InvalidUrl {
            url: input.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

/// Extract the domain from a URL string.
pub fn get_domain(url_str: &str) -> Option<String> {
    Url::parse(url_str)
        .ok()
        .and_then(|u| u.host_str().map(|s| s.to_string()))
}

/// Remove every newline and tab, then trim surrounding whitespace.
///
/// Characters are dropped, not replaced: `"foo\nbar"` becomes `"foobar"`.
/// Interior carriage returns are kept; only a surrounding one is trimmed.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !matches!(c, '\n' | '\t')).collect();
    stripped.trim().to_string()
}
