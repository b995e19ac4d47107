//! Feed document parsing and entry validation.
//!
//! Fetched bodies are tried as RSS 2.0 first, then Atom. A body that is
//! neither parses to zero entries; malformed feeds are never an error at
//! this level. Entries are capped at the configured maximum first and
//! validated second, so a feed page with junk entries can yield fewer
//! than the cap.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

/// Maximum number of tags kept per entry.
pub const MAX_TAGS: usize = 15;

/// A validated feed entry, before the article page is fetched.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub link: String,
    pub title: String,
    pub author: Option<String>,
    /// The date string as the feed carried it.
    pub published: Option<String>,
    /// Resolved timestamp; the parse chain falls back to the current time,
    /// so entries from a parsed feed always carry one.
    pub published_at: Option<DateTime<Utc>>,
    /// Raw summary HTML from the feed.
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

/// Parse a feed body into validated entries.
///
/// At most `max_entries` items are considered, in document order. When
/// `max_age_days` is set, entries older than the cutoff are dropped
/// before any article fetch happens.
pub fn parse_feed(body: &str, max_entries: usize, max_age_days: Option<i64>) -> Vec<RawEntry> {
    let entries: Vec<RawEntry> = if let Ok(channel) = rss::Channel::read_from(body.as_bytes()) {
        channel
            .items()
            .iter()
            .take(max_entries)
            .filter_map(entry_from_rss)
            .collect()
    } else if let Ok(feed) = atom_syndication::Feed::read_from(body.as_bytes()) {
        feed.entries()
            .iter()
            .take(max_entries)
            .filter_map(entry_from_atom)
            .collect()
    } else {
        debug!("body parsed as neither rss nor atom");
        Vec::new()
    };

    match max_age_days {
        Some(days) => {
            let cutoff = Utc::now() - chrono::Duration::days(days);
            entries
                .into_iter()
                .filter(|entry| entry.published_at.is_some_and(|ts| ts >= cutoff))
                .collect()
        }
        None => entries,
    }
}

/// A usable entry needs a real link and a title. Placeholder links some
/// feeds emit for unpublished slots are dropped here.
fn is_valid_entry(link: &str, title: &str) -> bool {
    !link.is_empty() && !title.is_empty() && link != "javascript:void(0)" && !link.starts_with('#')
}

fn entry_from_rss(item: &rss::Item) -> Option<RawEntry> {
    let link = item.link().unwrap_or_default().trim().to_string();
    let title = item.title().unwrap_or_default().trim().to_string();
    if !is_valid_entry(&link, &title) {
        debug!(%link, "skipping invalid rss entry");
        return None;
    }

    let published = item.pub_date().map(str::to_string);
    let published_at = Some(resolve_date(published.as_deref()));

    Some(RawEntry {
        link,
        title,
        // WordPress feeds carry the byline in dc:creator, not author.
        author: item
            .author()
            .map(str::to_string)
            .or_else(|| item.dublin_core_ext().and_then(|dc| dc.creators().first().cloned())),
        published,
        published_at,
        summary: item.description().map(str::to_string),
        tags: collect_tags(item.categories().iter().map(|c| c.name())),
    })
}

fn entry_from_atom(entry: &atom_syndication::Entry) -> Option<RawEntry> {
    let link = entry
        .links()
        .first()
        .map(|l| l.href().trim().to_string())
        .unwrap_or_default();
    let title = entry.title().as_str().trim().to_string();
    if !is_valid_entry(&link, &title) {
        debug!(%link, "skipping invalid atom entry");
        return None;
    }

    // Atom dates are already structured; `updated` is mandatory, so the
    // string parse chain never comes into play here.
    let timestamp = entry.published().unwrap_or(entry.updated());

    Some(RawEntry {
        link,
        title,
        author: entry.authors().first().map(|p| p.name().to_string()),
        published: Some(timestamp.to_rfc3339()),
        published_at: Some(timestamp.with_timezone(&Utc)),
        summary: entry.summary().map(|s| s.as_str().to_string()),
        tags: collect_tags(entry.categories().iter().map(|c| c.term())),
    })
}

fn collect_tags<'a>(terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for term in terms {
        let term = term.trim();
        if term.is_empty() || tags.iter().any(|t| t == term) {
            continue;
        }
        tags.push(term.to_string());
        if tags.len() == MAX_TAGS {
            break;
        }
    }
    tags
}

/// Resolve a feed date string, falling back to the current time.
///
/// Tries RFC 2822 first (the common RSS shape), then RFC 3339, then a
/// bare `YYYY-MM-DD HH:MM:SS`. An entry never fails for date reasons.
fn resolve_date(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(parse_date).unwrap_or_else(Utc::now)
}

pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>.NET Blog</title>
    <link>https://devblogs.microsoft.com/dotnet/</link>
    <description>News from the team</description>
    <item>
      <title>Announcing .NET 10</title>
      <link>https://devblogs.microsoft.com/dotnet/announcing-dotnet-10/</link>
      <pubDate>Tue, 11 Nov 2025 17:00:00 +0000</pubDate>
      <author>dotnetteam@microsoft.com (The .NET Team)</author>
      <dc:creator><![CDATA[Someone Else]]></dc:creator>
      <description>&lt;p&gt;Today we are releasing .NET 10.&lt;/p&gt;</description>
      <category>announcement</category>
      <category>dotnet</category>
      <category>announcement</category>
    </item>
    <item>
      <title>Placeholder entry</title>
      <link>#comments</link>
    </item>
    <item>
      <title>Performance improvements in ASP.NET Core</title>
      <link>https://devblogs.microsoft.com/dotnet/aspnet-core-performance/</link>
      <pubDate>Mon, 10 Nov 2025 09:30:00 +0000</pubDate>
      <dc:creator><![CDATA[Jane Developer]]></dc:creator>
    </item>
  </channel>
</rss>"#;

    const ATOM_FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blazor Updates</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93c-0003939e0af6</id>
  <updated>2025-11-12T08:00:00Z</updated>
  <entry>
    <title>Blazor in .NET 10</title>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <link href="https://devblogs.microsoft.com/aspnet/blazor-dotnet-10/"/>
    <updated>2025-11-12T08:00:00Z</updated>
    <published>2025-11-11T20:15:00Z</published>
    <author><name>Daniel Roth</name></author>
    <summary>What is new for Blazor.</summary>
    <category term="blazor"/>
  </entry>
  <entry>
    <title>Session notes</title>
    <id>urn:uuid:2225c695-cfb8-4ebb-aaaa-80da344efa6b</id>
    <link href="https://devblogs.microsoft.com/aspnet/session-notes/"/>
    <updated>2025-11-01T06:30:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn test_rss_drops_anchor_link_entry() {
        let entries = parse_feed(RSS_FIXTURE, 20, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].link,
            "https://devblogs.microsoft.com/dotnet/announcing-dotnet-10/"
        );
        assert_eq!(
            entries[1].link,
            "https://devblogs.microsoft.com/dotnet/aspnet-core-performance/"
        );
    }

    #[test]
    fn test_rss_entry_fields() {
        let entries = parse_feed(RSS_FIXTURE, 20, None);
        let first = &entries[0];
        assert_eq!(first.title, "Announcing .NET 10");
        assert_eq!(
            first.author.as_deref(),
            Some("dotnetteam@microsoft.com (The .NET Team)")
        );
        assert_eq!(
            first.published_at,
            Some(Utc.with_ymd_and_hms(2025, 11, 11, 17, 0, 0).unwrap())
        );
        assert_eq!(first.tags, vec!["announcement", "dotnet"]);
        assert!(first.summary.as_deref().unwrap().contains(".NET 10"));
    }

    #[test]
    fn test_dc_creator_byline_used_when_author_missing() {
        let entries = parse_feed(RSS_FIXTURE, 20, None);
        // WordPress style: the byline lives only in dc:creator.
        assert_eq!(entries[1].author.as_deref(), Some("Jane Developer"));
        // An explicit author element still wins over dc:creator.
        assert_eq!(
            entries[0].author.as_deref(),
            Some("dotnetteam@microsoft.com (The .NET Team)")
        );
    }

    #[test]
    fn test_entry_cap_applies_before_validation() {
        // The cap takes the first two items; the second is an anchor link,
        // so only one entry survives.
        let entries = parse_feed(RSS_FIXTURE, 2, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Announcing .NET 10");
    }

    #[test]
    fn test_javascript_void_link_dropped() {
        let body = RSS_FIXTURE.replace("#comments", "javascript:void(0)");
        let entries = parse_feed(&body, 20, None);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.link != "javascript:void(0)"));
    }

    #[test]
    fn test_missing_title_dropped() {
        let body = RSS_FIXTURE.replace("<title>Announcing .NET 10</title>", "");
        let entries = parse_feed(&body, 20, None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Performance improvements in ASP.NET Core");
    }

    #[test]
    fn test_atom_fallback_parses_entries() {
        let entries = parse_feed(ATOM_FIXTURE, 20, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Blazor in .NET 10");
        assert_eq!(entries[0].author.as_deref(), Some("Daniel Roth"));
        assert_eq!(entries[0].tags, vec!["blazor"]);
    }

    #[test]
    fn test_atom_prefers_published_over_updated() {
        let entries = parse_feed(ATOM_FIXTURE, 20, None);
        assert_eq!(
            entries[0].published_at,
            Some(Utc.with_ymd_and_hms(2025, 11, 11, 20, 15, 0).unwrap())
        );
        // Second entry has no published element, so updated is used.
        assert_eq!(
            entries[1].published_at,
            Some(Utc.with_ymd_and_hms(2025, 11, 1, 6, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_malformed_body_yields_no_entries() {
        assert!(parse_feed("definitely not xml", 20, None).is_empty());
        assert!(parse_feed("<html><body>an error page</body></html>", 20, None).is_empty());
    }

    #[test]
    fn test_unparseable_date_falls_back_to_now() {
        let body = RSS_FIXTURE.replace("Tue, 11 Nov 2025 17:00:00 +0000", "whenever");
        let before = Utc::now();
        let entries = parse_feed(&body, 20, None);
        let after = Utc::now();
        let ts = entries[0].published_at.unwrap();
        assert!(ts >= before && ts <= after);
        assert_eq!(entries[0].published.as_deref(), Some("whenever"));
    }

    #[test]
    fn test_recency_filter_drops_old_entries() {
        assert!(parse_feed(RSS_FIXTURE, 20, Some(1)).is_empty());
        assert_eq!(parse_feed(RSS_FIXTURE, 20, Some(36_500)).len(), 2);
    }

    #[test]
    fn test_recency_filter_keeps_now_fallback_entries() {
        let body = RSS_FIXTURE.replace("Tue, 11 Nov 2025 17:00:00 +0000", "whenever");
        let entries = parse_feed(&body, 20, Some(1));
        assert!(entries.iter().any(|e| e.title == "Announcing .NET 10"));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date("Tue, 11 Nov 2025 17:00:00 GMT"),
            Some(Utc.with_ymd_and_hms(2025, 11, 11, 17, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2025-11-11T17:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2025, 11, 11, 15, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2025-11-11 17:00:00"),
            Some(Utc.with_ymd_and_hms(2025, 11, 11, 17, 0, 0).unwrap())
        );
        assert_eq!(parse_date("whenever"), None);
    }

    #[test]
    fn test_tags_deduplicated_and_capped() {
        let entries = parse_feed(RSS_FIXTURE, 20, None);
        // The duplicate announcement category collapses.
        assert_eq!(entries[0].tags, vec!["announcement", "dotnet"]);

        let many: Vec<String> = (0..30).map(|i| format!("tag{i}")).collect();
        let tags = collect_tags(many.iter().map(String::as_str));
        assert_eq!(tags.len(), MAX_TAGS);
    }
}
