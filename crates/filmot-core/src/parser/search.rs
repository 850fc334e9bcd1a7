//! Search results parser for filmot.com
//!
//! Every hit on a results page shows the YouTube thumbnail of the video,
//! so the video ids are read back out of the `<img src>` attributes.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::{FilmotError, Result};
use crate::types::VideoId;

/// `https://img.youtube.com/vi/<ID>/<digit>.jpg`, optionally followed by a query
static THUMBNAIL_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://img\.youtube\.com/vi/([^/]+)/\d\.jpg(?:[?#].*)?$")
        .expect("thumbnail pattern is valid")
});

/// Parses a search results page and returns the video ids in document order
///
/// # Arguments
/// * `html` - Raw HTML string from a search results page
///
/// # Returns
/// Video ids of every matching thumbnail, empty if the page has none
///
/// # Errors
/// Returns `ParseError` if the image selector cannot be built
pub fn parse_search_results(html: &str) -> Result<Vec<VideoId>> {
    let document = Html::parse_document(html);
    extract_video_ids(&document)
}

/// Extracts video ids from an already parsed document
///
/// Duplicates are kept; the same thumbnail twice yields the id twice.
pub fn extract_video_ids(document: &Html) -> Result<Vec<VideoId>> {
    let img_selector = Selector::parse("img[src]")
        .map_err(|e| FilmotError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let ids = document
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .filter_map(video_id_from_thumbnail)
        .collect();

    Ok(ids)
}

/// Extracts the id from a single thumbnail URL
fn video_id_from_thumbnail(src: &str) -> Option<VideoId> {
    THUMBNAIL_URL
        .captures(src.trim())
        .and_then(|caps| caps.get(1))
        .map(|id| VideoId::new(id.as_str()))
}
