//! Data models for aggregated articles and the pipeline result.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`Article`]: A feed entry enriched with scraped page content
//! - [`ContentExtraction`]: What the article-page scrape produced
//! - [`ArticleImage`] / [`ImageKind`]: Classified images found in a page
//! - [`FeedReport`] / [`FetchSummary`] / [`FetchResult`]: Per-run reporting
//! - [`ProjectedResult`]: A filtered view of a result (category, search, latest)
//!
//! Extraction fields are flattened into the article during serialization so
//! consumers see one flat JSON object per article.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully enriched article from one of the registered feeds.
///
/// Combines the validated feed entry (title, link, author, summary, tags),
/// the scraped page content, and the derived classification fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Article {
    /// Article headline from the feed entry.
    pub title: String,
    /// Canonical article URL; also the deduplication key.
    pub url: String,
    /// Cleaned byline, falling back to the team default.
    pub author: String,
    /// The raw date string as it appeared in the feed.
    pub published: String,
    /// Resolved publication timestamp; sorts last when absent.
    pub published_at: Option<DateTime<Utc>>,
    /// Name of the registry feed this entry came from.
    pub feed_source: String,
    /// Tag-stripped entry summary, capped at 500 characters.
    pub summary: String,
    /// Feed category terms, deduplicated, at most 15.
    pub tags: Vec<String>,
    /// Scraped page content, flattened into the article on serialization.
    #[serde(flatten)]
    pub content: ContentExtraction,
    /// Assigned taxonomy category, or `General`.
    pub category: String,
    /// Ranked domain keywords, at most 15.
    pub keywords: Vec<String>,
    /// Estimated reading time at 200 words per minute.
    pub reading_time_minutes: f64,
}

impl Article {
    /// Timestamp used for ordering; articles without one sort as oldest.
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Everything the article-page scrape produced.
///
/// The `Default` value is the empty extraction, used whenever the page
/// could not be fetched or read; the article is still emitted with
/// `has_full_content = false`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContentExtraction {
    /// Readable text blocks joined by blank lines, capped at 20 000 chars.
    pub full_content: String,
    /// Length of the extracted text before the cap was applied.
    pub content_length: usize,
    /// Number of text blocks that survived the length filter.
    pub paragraph_count: usize,
    /// Content images, classified and captioned, at most 25.
    pub images: Vec<ArticleImage>,
    /// Whether any readable text was extracted.
    pub has_full_content: bool,
    /// Whether any content image survived filtering.
    pub has_images: bool,
    /// Whether the page carries at least one code block.
    pub has_code: bool,
    /// Number of `pre`/`code` blocks with more than trivial text.
    pub code_snippet_count: usize,
}

/// An image found in an article page, with resolved URL and classification.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArticleImage {
    /// Absolute image URL, resolved against the page URL.
    pub url: String,
    /// Alt text, capped at 300 characters.
    pub alt: String,
    /// Title attribute, capped at 300 characters.
    pub title: String,
    /// Raw width attribute when present.
    pub width: Option<String>,
    /// Raw height attribute when present.
    pub height: Option<String>,
    /// Heuristic image classification.
    #[serde(rename = "type")]
    pub kind: ImageKind,
    /// Figure caption or adjacent short paragraph, capped at 500 chars.
    pub caption: String,
}

/// Heuristic classification of an article image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    Logo,
    Screenshot,
    Diagram,
    CodeExample,
    Banner,
    ContentImage,
}

/// Outcome of fetching a single registry feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    Success,
    Error,
}

/// Per-feed report included in every [`FetchResult`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedReport {
    pub feed_name: String,
    pub status: FeedStatus,
    pub articles_fetched: usize,
    /// Present only when `status` is `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate statistics over the deduplicated article list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchSummary {
    pub total_articles: usize,
    pub total_feeds_processed: usize,
    pub successful_feeds: usize,
    pub failed_feeds: usize,
    pub total_images: usize,
    pub articles_with_content: usize,
    pub articles_with_images: usize,
    pub average_reading_time_minutes: f64,
}

/// One entry of the category distribution, ordered by descending count.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// The complete result of one aggregation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchResult {
    pub success: bool,
    /// When the run finished, UTC.
    pub timestamp: DateTime<Utc>,
    pub fetch_duration_seconds: f64,
    pub summary: FetchSummary,
    pub feed_results: Vec<FeedReport>,
    /// Category distribution sorted by descending count.
    pub content_categories: Vec<CategoryCount>,
    /// Deduplicated articles, newest first.
    pub articles: Vec<Article>,
}

impl FetchResult {
    /// Articles whose category matches, case-insensitively.
    pub fn filter_by_category(&self, category: &str) -> Vec<Article> {
        let wanted = category.to_lowercase();
        self.articles
            .iter()
            .filter(|a| a.category.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    /// Articles matching a case-insensitive substring search over title,
    /// full content, summary, and keywords.
    pub fn search(&self, query: &str) -> Vec<Article> {
        let needle = query.to_lowercase();
        self.articles
            .iter()
            .filter(|a| {
                a.title.to_lowercase().contains(&needle)
                    || a.content.full_content.to_lowercase().contains(&needle)
                    || a.summary.to_lowercase().contains(&needle)
                    || a.keywords.iter().any(|k| k.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// The `limit` most recent articles, newest first.
    pub fn latest(&self, limit: usize) -> Vec<Article> {
        let mut articles = self.articles.clone();
        articles.sort_by_key(|a| std::cmp::Reverse(a.sort_timestamp()));
        articles.truncate(limit);
        articles
    }

    pub fn project_category(&self, category: &str) -> ProjectedResult {
        let articles = self.filter_by_category(category);
        ProjectedResult {
            success: true,
            timestamp: Utc::now(),
            category: Some(category.to_string()),
            query: None,
            count: articles.len(),
            articles,
        }
    }

    pub fn project_search(&self, query: &str) -> ProjectedResult {
        let articles = self.search(query);
        ProjectedResult {
            success: true,
            timestamp: Utc::now(),
            category: None,
            query: Some(query.to_string()),
            count: articles.len(),
            articles,
        }
    }

    pub fn project_latest(&self, limit: usize) -> ProjectedResult {
        let articles = self.latest(limit);
        ProjectedResult {
            success: true,
            timestamp: Utc::now(),
            category: None,
            query: None,
            count: articles.len(),
            articles,
        }
    }
}

/// A filtered view of a [`FetchResult`], written in place of the full
/// digest when the CLI applies a projection.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectedResult {
    pub success: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub count: usize,
    pub articles: Vec<Article>,
}
