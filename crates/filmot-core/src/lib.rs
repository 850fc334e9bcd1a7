//! Filmot Scraper Core Library
//!
//! Collects the YouTube video ids referenced by filmot.com subtitle search
//! results and renders them through a user supplied template.
//!
//! # Overview
//!
//! This crate provides:
//! - URL builders for filmot.com result pages and YouTube watch pages
//! - An HTTP page fetcher, behind the [`PageFetcher`] trait
//! - An HTML parser that reads video ids out of thumbnail URLs
//! - A bounded, page-ordered fan-out over many result pages
//! - Validated output templates and separator handling
//!
//! # Example
//!
//! ```no_run
//! use filmot_core::{FilmotScraper, OutputTemplate, Result, render_all};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let template = OutputTemplate::parse("%(yt_url)s%(video_id)s")?;
//!     let scraper = FilmotScraper::new()?;
//!
//!     let results = scraper.search("never gonna give you up", 2).await?;
//!     println!("{}", render_all(&results.video_ids, &template, r"\n"));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Logging
//!
//! The library emits `tracing` events and spans but never installs a
//! subscriber. Whatever subscriber the caller has in scope receives them.

mod client;
mod error;
pub mod format;
pub mod parser;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, FilmotClient, PageFetcher};

// Re-export error types
pub use error::{FilmotError, Result};

// Re-export formatting helpers
pub use format::{
    DEFAULT_TEMPLATE, OutputTemplate, format_output, join_output, render_all, unescape_separator,
};

// Re-export parser functions
pub use parser::{extract_video_ids, parse_search_results};

// Re-export main scraper API
pub use scraper::{FilmotScraper, ScraperConfig};

// Re-export data types
pub use types::{PageReport, PageStatus, SearchResults, VideoId};

// Re-export URL helper functions for convenience
pub use url::{build_search_url, build_watch_url, video_id_from_watch_url};
