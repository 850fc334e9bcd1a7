//! Output formatting for collected video ids
//!
//! Templates use the percent-style `%(key)s` placeholders the tool has
//! always accepted, but are parsed and validated up front: only `yt_url`
//! and `video_id` are known keys, and `%%` is a literal percent sign.

use std::str::FromStr;

use crate::error::{FilmotError, Result};
use crate::types::VideoId;
use crate::url::YT_VIDEO_URL;

/// Template used when the caller does not supply one
pub const DEFAULT_TEMPLATE: &str = "%(yt_url)s%(video_id)s";

/// Placeholder key for the YouTube watch URL prefix
pub const YT_URL_KEY: &str = "yt_url";

/// Placeholder key for the video id
pub const VIDEO_ID_KEY: &str = "video_id";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    YtUrl,
    VideoId,
}

/// A parsed, validated output template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Parses a template string
    ///
    /// # Errors
    /// - `UnknownPlaceholder` for a `%(key)s` with any other key
    /// - `InvalidTemplate` for an unterminated placeholder, a conversion
    ///   other than `s`, or a stray `%`
    ///
    /// # Example
    /// ```
    /// use filmot_core::{OutputTemplate, VideoId};
    /// let template = OutputTemplate::parse("%(yt_url)s%(video_id)s")?;
    /// assert_eq!(
    ///     template.render(&VideoId::new("abc123XYZ0")),
    ///     "https://www.youtube.com/watch?v=abc123XYZ0"
    /// );
    /// # Ok::<(), filmot_core::FilmotError>(())
    /// ```
    pub fn parse(template: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('%') {
            literal.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('%') {
                literal.push('%');
                rest = tail;
                continue;
            }

            let Some(inner) = after.strip_prefix('(') else {
                return Err(FilmotError::InvalidTemplate(format!(
                    "stray '%' at byte {} (use '%%' for a literal percent sign)",
                    template.len() - rest.len() + pos
                )));
            };

            let Some(close) = inner.find(')') else {
                return Err(FilmotError::InvalidTemplate(
                    "unterminated placeholder".to_string(),
                ));
            };

            let key = &inner[..close];
            let Some(tail) = inner[close + 1..].strip_prefix('s') else {
                return Err(FilmotError::InvalidTemplate(format!(
                    "placeholder '{}' must use the 's' conversion",
                    key
                )));
            };

            let segment = match key {
                YT_URL_KEY => Segment::YtUrl,
                VIDEO_ID_KEY => Segment::VideoId,
                other => return Err(FilmotError::UnknownPlaceholder(other.to_string())),
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            rest = tail;
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Renders one video id through the template
    pub fn render(&self, video_id: &VideoId) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::YtUrl => out.push_str(YT_VIDEO_URL),
                Segment::VideoId => out.push_str(video_id.as_str()),
            }
        }
        out
    }
}

impl Default for OutputTemplate {
    fn default() -> Self {
        Self {
            segments: vec![Segment::YtUrl, Segment::VideoId],
        }
    }
}

impl FromStr for OutputTemplate {
    type Err = FilmotError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Renders a video id through a template
pub fn format_output(video_id: &VideoId, template: &OutputTemplate) -> String {
    template.render(video_id)
}

/// Turns the two-character escapes `\r` and `\n` into control characters
///
/// # Example
/// ```
/// use filmot_core::unescape_separator;
/// assert_eq!(unescape_separator(r"\r\n"), "\r\n");
/// ```
pub fn unescape_separator(separator: &str) -> String {
    separator.replace("\\r", "\r").replace("\\n", "\n")
}

/// Joins formatted records with an escaped separator
pub fn join_output<S: AsRef<str>>(records: &[S], separator: &str) -> String {
    let separator = unescape_separator(separator);
    records
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&separator)
}

/// Formats every id and joins the results
pub fn render_all(video_ids: &[VideoId], template: &OutputTemplate, separator: &str) -> String {
    let records: Vec<String> = video_ids
        .iter()
        .map(|id| format_output(id, template))
        .collect();
    join_output(&records, separator)
}
