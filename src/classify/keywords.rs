//! Vocabulary-driven keyword extraction.
//!
//! Tokens are matched against a fixed .NET-ecosystem vocabulary and ranked
//! by frequency. Ranking is deterministic: ties keep first-seen order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// Maximum number of keywords attached to an article.
pub const MAX_KEYWORDS: usize = 15;

// `#`, `+` and `.` are word characters here so terms like asp.net survive
// tokenization.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z#+.]{2,}\b").unwrap());

static DOTNET_VOCABULARY: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "dotnet",
        "net",
        "csharp",
        "fsharp",
        "aspnet",
        "blazor",
        "maui",
        "entity",
        "framework",
        "core",
        "web",
        "api",
        "mvc",
        "razor",
        "visual",
        "studio",
        "azure",
        "cloud",
        "performance",
        "security",
        "update",
        "release",
        "announcement",
        "tutorial",
        "guide",
        "code",
        "development",
        "programming",
        "windows",
        "linux",
        "macos",
        "github",
        "copilot",
        "ai",
        "machine",
        "learning",
        "docker",
        "kubernetes",
        "microservices",
        "asp.net",
        ".net",
    ]
    .into_iter()
    .collect()
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "that", "with", "this", "have", "from", "will", "are", "can",
        "was", "were", "been", "what", "when", "where", "which", "who", "how", "your",
        "their", "our", "its",
    ]
    .into_iter()
    .collect()
});

/// Extract up to `limit` ranked keywords from article text.
///
/// Tokens outside the vocabulary (or on the stop list) are discarded;
/// survivors are ranked by frequency, first-seen order breaking ties.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let lowered = text.to_lowercase();

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in TOKEN_RE.find_iter(&lowered) {
        let word = token.as_str();
        if !DOTNET_VOCABULARY.contains(word) || STOP_WORDS.contains(word) {
            continue;
        }
        let count = counts.entry(word).or_insert(0);
        if *count == 0 {
            order.push(word);
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order.into_iter().map(|w| (w, counts[w])).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(word, _)| word.to_string())
        .collect()
}
