//! Concurrent feed aggregation and article enrichment.
//!
//! The fetcher walks the feed registry a few feeds at a time, parses each
//! feed body, then visits every entry's article page to extract content.
//! Entry pages within one feed are fetched sequentially with a short pause
//! between requests. One failing feed never fails the run: it is recorded
//! in the per-feed reports and the rest of the pipeline continues.

use chrono::Utc;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

pub mod content;
pub mod feed;

use crate::classify::{categorize, extract_keywords, MAX_KEYWORDS};
use crate::error::{FetchError, Result};
use crate::feeds::{FeedSource, DOTNET_FEEDS};
use crate::models::{
    Article, CategoryCount, ContentExtraction, FeedReport, FeedStatus, FetchResult, FetchSummary,
};
use crate::utils::{
    clean_author, reading_time_minutes, round1, round2, strip_html, truncate_chars,
};
use feed::RawEntry;

/// Feeds fetched in parallel at any one time.
pub const FEED_CONCURRENCY: usize = 5;
/// Default cap on entries taken from a single feed.
pub const DEFAULT_MAX_PER_FEED: usize = 20;
/// Pause between article-page requests within one feed.
const ENTRY_THROTTLE: Duration = Duration::from_millis(200);
const FEED_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ARTICLE_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_SUMMARY_CHARS: usize = 500;

/// Some of the blog endpoints refuse obviously non-browser clients.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Tunable knobs for one aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Most entries taken from any single feed.
    pub max_per_feed: usize,
    /// When set, entries older than this many days are dropped.
    pub max_age_days: Option<i64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_per_feed: DEFAULT_MAX_PER_FEED,
            max_age_days: None,
        }
    }
}

/// The aggregation client: one shared HTTP client plus run options.
#[derive(Debug, Clone)]
pub struct DotNetFetcher {
    client: Client,
    options: FetchOptions,
}

impl DotNetFetcher {
    pub fn new() -> Result<Self> {
        Self::with_options(FetchOptions::default())
    }

    pub fn with_options(options: FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(FEED_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self { client, options })
    }

    /// Fetch every feed in `feeds` and assemble the run result.
    ///
    /// Feeds are processed [`FEED_CONCURRENCY`] at a time; per-feed reports
    /// keep the registry order regardless of completion order.
    #[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
    pub async fn fetch_all(&self, feeds: &[FeedSource]) -> FetchResult {
        let started = Instant::now();

        let mut keyed: Vec<(usize, &FeedSource, Result<Vec<Article>>)> =
            stream::iter(feeds.iter().enumerate())
                .map(|(idx, feed)| async move { (idx, feed, self.fetch_feed(feed).await) })
                .buffer_unordered(FEED_CONCURRENCY)
                .collect()
                .await;
        keyed.sort_by_key(|entry| entry.0);

        let outcomes = keyed
            .into_iter()
            .map(|(_, feed, outcome)| (feed.name.to_string(), outcome))
            .collect();
        assemble_result(outcomes, started.elapsed())
    }

    #[instrument(level = "info", skip_all, fields(feed = feed.name))]
    async fn fetch_feed(&self, feed: &FeedSource) -> Result<Vec<Article>> {
        debug!(url = feed.url, "requesting feed");
        let response = self.client.get(feed.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::BadStatus(response.status()));
        }
        let body = response.text().await?;

        let entries = feed::parse_feed(&body, self.options.max_per_feed, self.options.max_age_days);
        if entries.is_empty() {
            warn!(feed = feed.name, "no usable entries in feed");
            return Ok(Vec::new());
        }

        let mut articles = Vec::with_capacity(entries.len());
        for entry in entries {
            articles.push(self.build_article(entry, feed.name).await);
            tokio::time::sleep(ENTRY_THROTTLE).await;
        }
        info!(feed = feed.name, articles = articles.len(), "feed fetched");
        Ok(articles)
    }

    /// Turn a validated feed entry into a fully enriched article.
    ///
    /// The article page is fetched for content; classification then runs
    /// over whatever text is available, so an unreachable page still
    /// yields a categorized article from its title and summary.
    async fn build_article(&self, entry: RawEntry, feed_name: &str) -> Article {
        let content = self.fetch_article_content(&entry.link).await;

        let summary =
            truncate_chars(&strip_html(entry.summary.as_deref().unwrap_or("")), MAX_SUMMARY_CHARS)
                .to_string();
        let analysis = format!("{} {} {}", content.full_content, summary, entry.title);
        let category = categorize(&analysis, &entry.link, &entry.title);
        let keywords = extract_keywords(&analysis, MAX_KEYWORDS);
        let reading_time_minutes = reading_time_minutes(&content.full_content);

        Article {
            title: entry.title,
            url: entry.link,
            author: clean_author(entry.author.as_deref()),
            published: entry.published.unwrap_or_default(),
            published_at: entry.published_at,
            feed_source: feed_name.to_string(),
            summary,
            tags: entry.tags,
            content,
            category,
            keywords,
            reading_time_minutes,
        }
    }

    /// Fetch and extract an article page, degrading to the empty
    /// extraction on any failure.
    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn fetch_article_content(&self, url: &str) -> ContentExtraction {
        let Ok(page_url) = Url::parse(url) else {
            debug!("article link is not a valid url");
            return ContentExtraction::default();
        };

        let response = match self
            .client
            .get(page_url.clone())
            .timeout(ARTICLE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(status = %response.status(), "article page returned error status");
                return ContentExtraction::default();
            }
            Err(e) => {
                debug!(error = %e, "article page request failed");
                return ContentExtraction::default();
            }
        };

        match response.text().await {
            Ok(body) => content::extract_content(&body, &page_url),
            Err(e) => {
                debug!(error = %e, "article page body could not be read");
                ContentExtraction::default()
            }
        }
    }
}

/// Fetch the whole registry and assemble the run result.
///
/// This is the main library entry point; the binary calls it once per run.
#[instrument(level = "info", skip_all)]
pub async fn fetch_dotnet_content(options: FetchOptions) -> Result<FetchResult> {
    let fetcher = DotNetFetcher::with_options(options)?;
    Ok(fetcher.fetch_all(DOTNET_FEEDS).await)
}

/// Fold per-feed outcomes into the final result.
///
/// Articles are deduplicated by URL (first feed in registry order wins),
/// then sorted newest first. Per-feed counts are recorded before
/// deduplication.
fn assemble_result(outcomes: Vec<(String, Result<Vec<Article>>)>, elapsed: Duration) -> FetchResult {
    let mut feed_results = Vec::with_capacity(outcomes.len());
    let mut collected: Vec<Article> = Vec::new();

    for (feed_name, outcome) in outcomes {
        match outcome {
            Ok(articles) => {
                feed_results.push(FeedReport {
                    feed_name,
                    status: FeedStatus::Success,
                    articles_fetched: articles.len(),
                    error: None,
                });
                collected.extend(articles);
            }
            Err(e) => {
                warn!(feed = %feed_name, error = %e, "feed failed");
                feed_results.push(FeedReport {
                    feed_name,
                    status: FeedStatus::Error,
                    articles_fetched: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let articles: Vec<Article> = collected
        .into_iter()
        .unique_by(|article| article.url.clone())
        .sorted_by_key(|article| Reverse(article.sort_timestamp()))
        .collect();

    let summary = summarize(&feed_results, &articles);
    let content_categories = category_distribution(&articles);

    FetchResult {
        success: true,
        timestamp: Utc::now(),
        fetch_duration_seconds: round2(elapsed.as_secs_f64()),
        summary,
        feed_results,
        content_categories,
        articles,
    }
}

fn summarize(feed_results: &[FeedReport], articles: &[Article]) -> FetchSummary {
    let successful_feeds = feed_results
        .iter()
        .filter(|r| r.status == FeedStatus::Success)
        .count();
    let average_reading_time_minutes = if articles.is_empty() {
        0.0
    } else {
        let total: f64 = articles.iter().map(|a| a.reading_time_minutes).sum();
        round1(total / articles.len() as f64)
    };

    FetchSummary {
        total_articles: articles.len(),
        total_feeds_processed: feed_results.len(),
        successful_feeds,
        failed_feeds: feed_results.len() - successful_feeds,
        total_images: articles.iter().map(|a| a.content.images.len()).sum(),
        articles_with_content: articles.iter().filter(|a| a.content.has_full_content).count(),
        articles_with_images: articles.iter().filter(|a| a.content.has_images).count(),
        average_reading_time_minutes,
    }
}

/// Category counts ordered by descending count; categories tied on count
/// keep the order they were first seen in.
fn category_distribution(articles: &[Article]) -> Vec<CategoryCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for article in articles {
        let category = article.category.as_str();
        if !counts.contains_key(category) {
            order.push(category);
        }
        *counts.entry(category).or_insert(0) += 1;
    }

    let mut distribution: Vec<CategoryCount> = order
        .into_iter()
        .map(|category| CategoryCount {
            category: category.to_string(),
            count: counts[category],
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count));
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_article(url: &str, feed: &str, category: &str, day: Option<u32>) -> Article {
        Article {
            title: format!("Article at {url}"),
            url: url.to_string(),
            author: "Microsoft .NET Team".to_string(),
            published: String::new(),
            published_at: day.map(|d| Utc.with_ymd_and_hms(2026, 1, d, 12, 0, 0).unwrap()),
            feed_source: feed.to_string(),
            summary: String::new(),
            tags: vec![],
            content: ContentExtraction::default(),
            category: category.to_string(),
            keywords: vec![],
            reading_time_minutes: 0.0,
        }
    }

    fn elapsed() -> Duration {
        Duration::from_millis(1234)
    }

    #[test]
    fn test_duplicate_urls_keep_first_feed() {
        let mut from_a = sample_article("https://x/shared", "A", "General", Some(2));
        from_a.title = "From A".to_string();
        let mut from_b = sample_article("https://x/shared", "B", "General", Some(2));
        from_b.title = "From B".to_string();
        let only_b = sample_article("https://x/only-b", "B", "General", Some(1));

        let result = assemble_result(
            vec![
                ("A".to_string(), Ok(vec![from_a])),
                ("B".to_string(), Ok(vec![from_b, only_b])),
            ],
            elapsed(),
        );

        assert_eq!(result.articles.len(), 2);
        let shared = result.articles.iter().find(|a| a.url == "https://x/shared").unwrap();
        assert_eq!(shared.title, "From A");
        assert_eq!(shared.feed_source, "A");
        // Per-feed counts are pre-deduplication.
        assert_eq!(result.feed_results[0].articles_fetched, 1);
        assert_eq!(result.feed_results[1].articles_fetched, 2);
    }

    #[test]
    fn test_articles_sorted_newest_first_undated_last() {
        let result = assemble_result(
            vec![(
                "A".to_string(),
                Ok(vec![
                    sample_article("https://x/old", "A", "General", Some(1)),
                    sample_article("https://x/undated", "A", "General", None),
                    sample_article("https://x/new", "A", "General", Some(9)),
                ]),
            )],
            elapsed(),
        );

        let urls: Vec<&str> = result.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/new", "https://x/old", "https://x/undated"]);
    }

    #[test]
    fn test_failed_feed_reported_without_failing_run() {
        let result = assemble_result(
            vec![
                (
                    "Good".to_string(),
                    Ok(vec![sample_article("https://x/a", "Good", "General", Some(1))]),
                ),
                (
                    "Bad".to_string(),
                    Err(FetchError::BadStatus(reqwest::StatusCode::NOT_FOUND)),
                ),
            ],
            elapsed(),
        );

        assert!(result.success);
        assert_eq!(result.articles.len(), 1);
        assert_eq!(result.feed_results[1].status, FeedStatus::Error);
        assert_eq!(result.feed_results[1].articles_fetched, 0);
        assert!(result.feed_results[1].error.as_deref().unwrap().contains("404"));
        assert_eq!(result.summary.successful_feeds, 1);
        assert_eq!(result.summary.failed_feeds, 1);
    }

    #[test]
    fn test_summary_statistics() {
        let mut with_everything = sample_article("https://x/a", "A", "General", Some(3));
        with_everything.content.has_full_content = true;
        with_everything.content.has_images = true;
        with_everything.content.images = vec![
            crate::models::ArticleImage {
                url: "https://x/i1.png".to_string(),
                alt: String::new(),
                title: String::new(),
                width: None,
                height: None,
                kind: crate::models::ImageKind::ContentImage,
                caption: String::new(),
            },
            crate::models::ArticleImage {
                url: "https://x/i2.png".to_string(),
                alt: String::new(),
                title: String::new(),
                width: None,
                height: None,
                kind: crate::models::ImageKind::Diagram,
                caption: String::new(),
            },
        ];
        with_everything.reading_time_minutes = 2.0;

        let mut text_only = sample_article("https://x/b", "A", "General", Some(2));
        text_only.content.has_full_content = true;
        text_only.reading_time_minutes = 1.0;

        let empty = sample_article("https://x/c", "A", "General", Some(1));

        let result = assemble_result(
            vec![("A".to_string(), Ok(vec![with_everything, text_only, empty]))],
            elapsed(),
        );

        let summary = &result.summary;
        assert_eq!(summary.total_articles, 3);
        assert_eq!(summary.total_feeds_processed, 1);
        assert_eq!(summary.articles_with_content, 2);
        assert_eq!(summary.articles_with_images, 1);
        assert_eq!(summary.total_images, 2);
        assert_eq!(summary.average_reading_time_minutes, 1.0);
        assert_eq!(result.fetch_duration_seconds, 1.23);
    }

    #[test]
    fn test_category_distribution_count_then_first_seen() {
        let result = assemble_result(
            vec![(
                "A".to_string(),
                Ok(vec![
                    sample_article("https://x/1", "A", "Web Development", Some(9)),
                    sample_article("https://x/2", "A", "Core Platform", Some(8)),
                    sample_article("https://x/3", "A", "Web Development", Some(7)),
                    sample_article("https://x/4", "A", "Cloud & Azure", Some(6)),
                ]),
            )],
            elapsed(),
        );

        let pairs: Vec<(&str, usize)> = result
            .content_categories
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            pairs,
            vec![("Web Development", 2), ("Core Platform", 1), ("Cloud & Azure", 1)]
        );
    }

    #[test]
    fn test_all_feeds_failed_still_well_formed() {
        let result = assemble_result(
            vec![
                (
                    "A".to_string(),
                    Err(FetchError::BadStatus(reqwest::StatusCode::BAD_GATEWAY)),
                ),
                (
                    "B".to_string(),
                    Err(FetchError::BadStatus(reqwest::StatusCode::NOT_FOUND)),
                ),
            ],
            elapsed(),
        );

        assert!(result.success);
        assert_eq!(result.summary.total_articles, 0);
        assert_eq!(result.summary.failed_feeds, 2);
        assert_eq!(result.summary.average_reading_time_minutes, 0.0);
        assert!(result.articles.is_empty());
        assert!(result.content_categories.is_empty());
    }

    #[test]
    fn test_fetch_options_default() {
        let options = FetchOptions::default();
        assert_eq!(options.max_per_feed, DEFAULT_MAX_PER_FEED);
        assert!(options.max_age_days.is_none());
    }

    #[tokio::test]
    async fn test_invalid_article_link_yields_empty_extraction() {
        let fetcher = DotNetFetcher::new().unwrap();
        let content = fetcher.fetch_article_content("not a valid url").await;
        assert!(!content.has_full_content);
        assert_eq!(content.content_length, 0);
    }

    #[tokio::test]
    async fn test_unsupported_scheme_yields_empty_extraction() {
        let fetcher = DotNetFetcher::new().unwrap();
        let content = fetcher.fetch_article_content("ftp://example.com/file").await;
        assert!(!content.has_full_content);
    }

    #[tokio::test]
    async fn test_build_article_classifies_from_feed_text_alone() {
        let fetcher = DotNetFetcher::new().unwrap();
        let entry = RawEntry {
            link: "not a valid url".to_string(),
            title: "Blazor performance tips".to_string(),
            author: None,
            published: Some("Tue, 01 Jul 2025 12:00:00 +0000".to_string()),
            published_at: feed::parse_date("Tue, 01 Jul 2025 12:00:00 +0000"),
            summary: Some("<p>Improving Blazor WebAssembly speed</p>".to_string()),
            tags: vec!["dotnet".to_string()],
        };

        let article = fetcher.build_article(entry, ".NET Blog").await;
        assert!(!article.content.has_full_content);
        assert_eq!(article.summary, "Improving Blazor WebAssembly speed");
        assert_eq!(article.author, "Microsoft .NET Team");
        // Web Development, Performance and Web UI tie on score; the
        // earliest category in taxonomy order wins.
        assert_eq!(article.category, "Web Development");
        assert_eq!(article.keywords, vec!["blazor", "performance"]);
        assert_eq!(article.reading_time_minutes, 0.0);
        assert_eq!(article.feed_source, ".NET Blog");
    }
}
