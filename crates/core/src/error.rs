//! Error types for precis operations.
//!
//! [`PrecisError`] covers everything that can stop a document from being
//! produced: fetching, extraction, Markdown conversion, file I/O and
//! configuration. Summarization has its own error type,
//! [`SummarizeError`](crate::summarize::SummarizeError), because a failed
//! summary never aborts a request.
//!
//! # Example
//!
//! ```rust
//! use precis_core::{PrecisError, Result};
//!
//! fn require_content(html: &str) -> Result<&str> {
//!     if html.trim().is_empty() {
//!         return Err(PrecisError::NoContent);
//!     }
//!     Ok(html)
//! }
//!
//! assert!(require_content("").is_err());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the article pipeline.
#[derive(Error, Debug)]
pub enum PrecisError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server responded with status {status}")]
    HttpStatus { status: u16 },

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML could not be parsed or rewritten.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// No readable content could be extracted from the document.
    #[error("No content could be extracted from the document")]
    NoContent,

    /// HTML to Markdown conversion failed.
    #[error("Failed to convert HTML to Markdown: {0}")]
    ConversionError(String),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Standard I/O errors for file and stdin access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is missing values or malformed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Retrieval, extraction or conversion failed for a requested article.
    ///
    /// This is the only error the reader entry points return; the inner
    /// error says which stage failed.
    #[error("could not fetch url {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: Box<PrecisError>,
    },
}

impl PrecisError {
    /// Wraps a pipeline error with the URL that was being read.
    pub fn fetch_failed(url: impl Into<String>, source: PrecisError) -> Self {
        PrecisError::FetchFailed { url: url.into(), source: Box::new(source) }
    }
}

impl From<toml::de::Error> for PrecisError {
    fn from(err: toml::de::Error) -> Self {
        PrecisError::ConfigError(err.to_string())
    }
}

/// Result type alias for PrecisError.
pub type Result<T> = std::result::Result<T, PrecisError>;
