//! Utility functions for text cleanup, truncation, and file system checks.
//!
//! This module provides small pure helpers used throughout the pipeline:
//! - HTML tag stripping and whitespace collapsing for feed summaries
//! - Author string cleanup with a sensible default
//! - Character-safe truncation for capped fields
//! - Reading time estimation and decimal rounding for summary statistics
//! - File system validation for the output directory

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Fallback byline used when a feed entry carries no usable author.
pub const DEFAULT_AUTHOR: &str = "Microsoft .NET Team";

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

/// Strip HTML tags from a string and normalize its whitespace.
///
/// Feed summaries arrive as HTML fragments; this reduces them to plain
/// text suitable for the 500-character summary field.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(strip_html("<p>Hello <b>world</b></p>"), "Hello world");
/// ```
pub fn strip_html(text: &str) -> String {
    collapse_whitespace(&TAG_RE.replace_all(text, ""))
}

/// Clean up an author string from a feed entry.
///
/// RSS authors frequently look like `Name <email@host>`; the bracketed
/// part is dropped, whitespace is collapsed, and the result is capped at
/// 100 characters. Missing or empty authors fall back to
/// [`DEFAULT_AUTHOR`].
pub fn clean_author(raw: Option<&str>) -> String {
    let cleaned = raw
        .map(|author| collapse_whitespace(&TAG_RE.replace_all(author, "")))
        .unwrap_or_default();
    if cleaned.is_empty() {
        DEFAULT_AUTHOR.to_string()
    } else {
        truncate_chars(&cleaned, 100).to_string()
    }
}

/// Truncate a string to at most `max` characters, on a character boundary.
///
/// Counts characters rather than bytes so multi-byte text never splits
/// mid-character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Estimate reading time in minutes at 200 words per minute.
///
/// # Returns
///
/// Minutes rounded to one decimal place; `0.0` for empty content.
pub fn reading_time_minutes(content: &str) -> f64 {
    if content.is_empty() {
        return 0.0;
    }
    let words = content.split_whitespace().count();
    round1(words as f64 / 200.0)
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test
/// by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or is not writable
/// (permission denied, read-only filesystem, etc.).
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
