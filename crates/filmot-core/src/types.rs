//! Core data types for the filmot scraper
//!
//! Contains the identifiers and per-run results passed between the
//! fetch, extract and format stages.

use std::fmt;

/// YouTube video id extracted from a thumbnail URL
///
/// Taken verbatim from the matched URL; no shape validation beyond the
/// thumbnail pattern itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VideoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Terminal state of a single page-task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Page was fetched and parsed; holds the number of ids it contributed
    Extracted(usize),
    /// Fetch failed; the page contributes nothing
    Failed(String),
}

/// What one results page contributed to a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// 1-based page number
    pub page: u32,

    /// Request URL the page was fetched from
    pub url: String,

    pub status: PageStatus,
}

impl PageReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, PageStatus::Failed(_))
    }
}

/// Outcome of a whole run, ordered by page number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Ids of page 1, then page 2, ... regardless of completion order
    pub video_ids: Vec<VideoId>,

    /// One report per requested page, ascending by page number
    pub pages: Vec<PageReport>,
}

impl SearchResults {
    pub fn len(&self) -> usize {
        self.video_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.video_ids.is_empty()
    }

    /// Number of pages whose fetch failed
    pub fn failed_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_failed()).count()
    }
}
