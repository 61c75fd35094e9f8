//! Formatting of clip documents for persistence.
//!
//! These functions only build strings; reading and writing files is left to
//! the caller.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::result::ConversionResult;
use crate::selection::SelectionMetadata;

/// Longest slug kept from a title, in chars
const MAX_SLUG_CHARS: usize = 60;

const FALLBACK_SLUG: &str = "clip";

static SLUG_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\s<>:"/\\|?*\x00-\x1f]+"#).expect("SLUG_SEPARATORS: hardcoded regex is valid")
});

static DASH_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-{2,}").expect("DASH_RUNS: hardcoded regex is valid"));

/// Render a clip as a complete, new Markdown document.
///
/// ```text
/// # Title
///
/// > Source: [example.com](https://example.com/post)
/// > Clipped: 2024-05-01 12:00:00 UTC
///
/// Body
/// ```
pub fn render_document(meta: &SelectionMetadata, result: &ConversionResult) -> String {
    let title = if meta.title.trim().is_empty() {
        meta.url.as_str()
    } else {
        meta.title.trim()
    };
    let domain = if meta.domain.is_empty() {
        meta.url.as_str()
    } else {
        meta.domain.as_str()
    };

    let mut doc = format!(
        "# {}\n\n> Source: [{}]({})\n> Clipped: {}\n",
        title,
        domain,
        meta.url,
        meta.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !result.markdown().is_empty() {
        doc.push('\n');
        doc.push_str(result.markdown());
        doc.push('\n');
    }
    doc
}

/// Render a clip as an entry to append to `existing` file contents.
///
/// The entry starts with a `---` separator. The returned string is only the
/// part to append; it fixes up a missing trailing newline in `existing`.
pub fn render_append_entry(
    existing: &str,
    meta: &SelectionMetadata,
    result: &ConversionResult,
) -> String {
    let document = render_document(meta, result);
    if existing.trim().is_empty() {
        return document;
    }

    let lead = if existing.ends_with("\n\n") {
        ""
    } else if existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    format!("{lead}---\n\n{document}")
}

/// Suggest a file name for a clip: `<slug>-YYYYMMDD-HHMMSS.md`.
pub fn suggest_filename(title: &str, timestamp: DateTime<Utc>) -> String {
    let slug = SLUG_SEPARATORS.replace_all(title.trim(), "-");
    let slug = DASH_RUNS.replace_all(&slug, "-");
    let slug: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_matches(|c| c == '-' || c == '.');

    let slug = if slug.is_empty() { FALLBACK_SLUG } else { slug };
    format!("{}-{}.md", slug, timestamp.format("%Y%m%d-%H%M%S"))
}
