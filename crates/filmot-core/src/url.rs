//! URL helper functions for filmot.com and YouTube
//!
//! Provides functions for building search page URLs and watch URLs.

use std::sync::LazyLock;

use regex::Regex;

/// Search endpoint of filmot.com, without trailing slash
pub const SEARCH_BASE_URL: &str = "https://filmot.com/search";

/// Prefix every rendered video id is appended to by default
pub const YT_VIDEO_URL: &str = "https://www.youtube.com/watch?v=";

/// Token whitespace runs in a query collapse into
const QUERY_JOINER: &str = "+";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Normalizes a search query for use as a path segment
///
/// Every whitespace run (leading and trailing ones included) becomes a
/// single `+`, and each remaining token is percent-encoded.
///
/// # Example
/// ```
/// use filmot_core::url::normalize_query;
/// assert_eq!(normalize_query("test  video"), "test+video");
/// assert_eq!(normalize_query("a/b c"), "a%2Fb+c");
/// ```
pub fn normalize_query(query: &str) -> String {
    WHITESPACE_RUN
        .split(query)
        .map(|token| urlencoding::encode(token).into_owned())
        .collect::<Vec<_>>()
        .join(QUERY_JOINER)
}

/// Builds the filmot.com search URL for a query and 1-based page number
///
/// # Example
/// ```
/// use filmot_core::url::build_search_url;
/// let url = build_search_url("test video", 1);
/// assert_eq!(url, "https://filmot.com/search/test+video/1/1?");
/// ```
pub fn build_search_url(query: &str, page: u32) -> String {
    build_search_url_with_base(SEARCH_BASE_URL, query, page)
}

/// Builds a search URL against an arbitrary search endpoint
///
/// Used to point the scraper at a mirror or a local mock server.
pub fn build_search_url_with_base(base: &str, query: &str, page: u32) -> String {
    format!(
        "{}/{}/1/{}?",
        base.trim_end_matches('/'),
        normalize_query(query),
        page
    )
}

/// Builds the YouTube watch URL for a video id
///
/// # Example
/// ```
/// use filmot_core::url::build_watch_url;
/// assert_eq!(build_watch_url("abc123XYZ0"), "https://www.youtube.com/watch?v=abc123XYZ0");
/// ```
pub fn build_watch_url(video_id: &str) -> String {
    format!("{}{}", YT_VIDEO_URL, video_id)
}

/// Recovers the video id from a YouTube watch URL
///
/// Returns `None` if the URL does not start with the watch prefix or
/// carries an empty id. Trailing query parameters are dropped.
pub fn video_id_from_watch_url(url: &str) -> Option<String> {
    let rest = url.strip_prefix(YT_VIDEO_URL)?;
    let id = rest.split('&').next().unwrap_or(rest);

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
