//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! various sources: HTTP/HTTPS URLs, local files, and standard input.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::{PrecisError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 6;

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Custom User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("Mozilla/5.0 (compatible; precis/", env!("CARGO_PKG_VERSION"), ")").to_string(),
        }
    }
}

/// Fetches HTML content from a URL.
///
/// Performs an HTTP GET request and returns the response body as text.
/// Redirects are followed, the configured timeout bounds the whole request,
/// and any non-success status is an error.
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_http_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(PrecisError::HttpError)?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching article");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| map_request_error(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PrecisError::HttpStatus { status: status.as_u16() });
    }

    let content = response.text().await.map_err(|e| map_request_error(e, config.timeout))?;
    debug!(bytes = content.len(), "article fetched");

    Ok(content)
}

/// Parses a URL and requires an http or https scheme.
pub fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| PrecisError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(PrecisError::InvalidUrl(format!(
            "unsupported scheme '{}' (expected http:// or https://)",
            other
        ))),
    }
}

fn map_request_error(err: reqwest::Error, timeout: u64) -> PrecisError {
    if err.is_timeout() { PrecisError::Timeout { timeout } } else { PrecisError::HttpError(err) }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(PrecisError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(PrecisError::from)
    }
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    Ok(buffer)
}
