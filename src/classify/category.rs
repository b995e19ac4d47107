//! Weighted category scoring against a fixed taxonomy.
//!
//! Each category carries an ordered list of patterns. An article's text is
//! scored per category as two points per pattern match plus a three-point
//! bonus when the category name itself appears in the article URL. The
//! strictly highest score wins; ties resolve to the earlier category in
//! taxonomy order, and an all-zero score falls back to [`GENERAL_CATEGORY`].

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Fallback category for articles that match nothing in the taxonomy.
pub const GENERAL_CATEGORY: &str = "General";

/// The taxonomy in priority order. Earlier categories win ties.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    (
        "News & Announcements",
        &[
            "announcement",
            "announce",
            "news",
            "update",
            "what's new",
            "released",
            "general availability",
            "ga",
            "preview",
            "rtm",
        ],
    ),
    (
        "Product Releases",
        &[
            "release",
            "version",
            r"v\d+\.\d+",
            r"\.net \d+",
            r"net\d+",
            r"visual studio \d+",
            r"vs \d+",
            "available now",
            "now available",
        ],
    ),
    (
        "Web Development",
        &[
            r"asp\.net",
            "blazor",
            "mvc",
            "web api",
            "razor",
            "signalr",
            "web development",
            "web app",
            "http",
            "rest",
            "api",
        ],
    ),
    (
        "Mobile Development",
        &[
            "maui",
            "xamarin",
            "mobile",
            "ios",
            "android",
            "cross.platform",
            "phone",
            "tablet",
            "app",
        ],
    ),
    (
        "Cloud & Azure",
        &[
            "azure",
            "cloud",
            "aws",
            "google cloud",
            "deploy",
            "scale",
            "container",
            "docker",
            "kubernetes",
            "aks",
            "app service",
        ],
    ),
    (
        "Data & ORM",
        &[
            "entity framework",
            "ef core",
            "database",
            "sql",
            "orm",
            "linq",
            "data access",
            "migration",
            "query",
        ],
    ),
    (
        "Programming Language",
        &[
            "c#",
            "csharp",
            "f#",
            "fsharp",
            r"vb\.net",
            "visual basic",
            "language",
            "syntax",
            "compiler",
            "roslyn",
        ],
    ),
    (
        "Performance & Optimization",
        &[
            "performance",
            "optimization",
            "speed",
            "memory",
            "gc",
            "garbage collection",
            "fast",
            "efficient",
            "benchmark",
        ],
    ),
    (
        "Tools & IDE",
        &[
            "visual studio",
            "vs code",
            "vscode",
            "ide",
            "debug",
            "intellisense",
            "editor",
            "tool",
            "extension",
        ],
    ),
    (
        "Core Platform",
        &[
            r"\.net core",
            "netcore",
            "core",
            "platform",
            "runtime",
            "framework",
            "sdk",
            "cli",
        ],
    ),
    (
        "Web UI Framework",
        &[
            "blazor",
            "web assembly",
            "wasm",
            "component",
            "ui",
            "frontend",
            "javascript",
            "interop",
        ],
    ),
    (
        "Security",
        &[
            "security",
            "authentication",
            "authorization",
            "identity",
            "jwt",
            "oauth",
            "https",
            "encryption",
            "secure",
        ],
    ),
    (
        "Community",
        &[
            "community",
            "contributor",
            "open source",
            "oss",
            "meetup",
            "conference",
            "user group",
            "feedback",
        ],
    ),
    (
        "Official Blog",
        &[r"\.net blog", "official", "microsoft", "team"],
    ),
];

static CATEGORY_PATTERNS: Lazy<Vec<(&'static str, Vec<Regex>)>> = Lazy::new(|| {
    CATEGORY_RULES
        .iter()
        .map(|(name, patterns)| {
            let compiled = patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .expect("static category pattern")
                })
                .collect();
            (*name, compiled)
        })
        .collect()
});

/// Assign a category to an article.
///
/// `content` is the combined article text (page content, summary, title);
/// the title and URL are appended to the scored text, and the URL also
/// feeds the category-name bonus.
pub fn categorize(content: &str, url: &str, title: &str) -> String {
    let analysis = format!("{} {} {}", content, title, url).to_lowercase();
    let url_lower = url.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (name, patterns) in CATEGORY_PATTERNS.iter() {
        let matches: usize = patterns.iter().map(|re| re.find_iter(&analysis).count()).sum();
        let mut score = matches * 2;
        if url_lower.contains(&name.to_lowercase()) {
            score += 3;
        }
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    best.map(|(name, _)| name.to_string())
        .unwrap_or_else(|| GENERAL_CATEGORY.to_string())
}
