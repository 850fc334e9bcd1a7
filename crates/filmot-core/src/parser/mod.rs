//! HTML parsers for filmot.com
//!
//! Contains modules for parsing different page types.

pub mod search;

pub use search::{extract_video_ids, parse_search_results};
