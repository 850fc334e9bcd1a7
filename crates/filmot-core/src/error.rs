//! Error types for the filmot scraper
//!
//! Fetch failures are carried as values inside per-page outcomes, so only
//! template and configuration errors ever reach the caller of a run.

use thiserror::Error;

/// Error type for all filmot scraper operations
#[derive(Error, Debug)]
pub enum FilmotError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Output template references a key other than `yt_url` or `video_id`
    #[error("Unknown placeholder in output template: {0}")]
    UnknownPlaceholder(String),

    /// Output template is not well formed
    #[error("Invalid output template: {0}")]
    InvalidTemplate(String),

    /// Scraper configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for filmot operations
pub type Result<T> = std::result::Result<T, FilmotError>;
