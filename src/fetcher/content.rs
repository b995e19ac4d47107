//! Article page content extraction.
//!
//! Everything here is synchronous and pure: the caller fetches the page
//! body, and these helpers walk the parsed document. The parsed DOM is
//! not `Send`, so it must never be held across an await point.
//!
//! Extraction picks a main content region (known selectors first, then
//! the densest `div`, then the whole document), collects readable text
//! blocks, classifies images, and counts code blocks. Content inside
//! boilerplate containers (navigation, footers, scripts and the like) is
//! ignored wherever it appears.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

use crate::models::{ArticleImage, ContentExtraction, ImageKind};
use crate::utils::truncate_chars;

/// Known main-content selectors, tried in order.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    ".entry-content",
    ".post-content",
    ".article-content",
    ".main-content",
    ".content",
    "main",
    r#"[role="main"]"#,
    ".blog-post-content",
    ".single-content",
];

/// Containers whose content is never article text.
const STRIP_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside", "form"];

/// A fallback `div` must hold more than this many text blocks to be
/// treated as the main region.
const MIN_REGION_BLOCKS: usize = 3;
/// Text blocks at or under this many characters are noise.
const MIN_BLOCK_CHARS: usize = 20;
const MAX_CONTENT_CHARS: usize = 20_000;
const MAX_IMAGES: usize = 25;
/// Code blocks need more than this many characters to count.
const MIN_SNIPPET_CHARS: usize = 10;
const MAX_IMAGE_TEXT_CHARS: usize = 300;
const MAX_CAPTION_CHARS: usize = 500;
/// A sibling paragraph longer than this is body text, not a caption.
const MAX_SIBLING_CAPTION_CHARS: usize = 200;

const IMAGE_SRC_ATTRS: &[&str] = &["src", "data-src", "data-lazy-src", "data-original"];
const TRACKING_URL_MARKERS: &[&str] = &["track", "pixel", "analytics", "beacon", "spacer"];

static MAIN_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    CONTENT_SELECTORS
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});
static BLOCK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p, h1, h2, h3, h4").unwrap());
static DIV_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("div").unwrap());
static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static CODE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("pre, code").unwrap());
static FIGCAPTION_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("figcaption").unwrap());

/// Extract readable content, images, and code-block counts from a page.
pub fn extract_content(html: &str, page_url: &Url) -> ContentExtraction {
    let document = Html::parse_document(html);
    let region = main_region(&document);

    let blocks = collect_blocks(region);
    let paragraph_count = blocks.len();
    let full = blocks.join("\n\n");
    let content_length = full.chars().count();
    let has_full_content = !full.trim().is_empty();
    let full_content = truncate_chars(&full, MAX_CONTENT_CHARS).to_string();

    let images = collect_images(region, page_url);
    let code_snippet_count = count_code_snippets(region);

    ContentExtraction {
        full_content,
        content_length,
        paragraph_count,
        has_full_content,
        has_images: !images.is_empty(),
        has_code: code_snippet_count > 0,
        code_snippet_count,
        images,
    }
}

/// Pick the main content region of a page.
fn main_region(document: &Html) -> ElementRef<'_> {
    for selector in MAIN_SELECTORS.iter() {
        if let Some(el) = document.select(selector).find(|el| !is_stripped(*el)) {
            return el;
        }
    }
    best_div(document).unwrap_or_else(|| document.root_element())
}

/// The `div` holding the most text blocks, when dense enough to be a
/// plausible article body. First such div wins a tie.
fn best_div(document: &Html) -> Option<ElementRef<'_>> {
    let mut best: Option<(ElementRef, usize)> = None;
    for div in document.select(&DIV_SELECTOR) {
        if is_stripped(div) {
            continue;
        }
        let blocks = div
            .select(&BLOCK_SELECTOR)
            .filter(|el| !in_stripped_region(*el))
            .count();
        if best.is_none_or(|(_, top)| blocks > top) {
            best = Some((div, blocks));
        }
    }
    best.and_then(|(div, blocks)| (blocks > MIN_REGION_BLOCKS).then_some(div))
}

/// A region candidate is unusable when it is itself a boilerplate
/// container, not only when it sits inside one.
fn is_stripped(el: ElementRef<'_>) -> bool {
    STRIP_TAGS.contains(&el.value().name()) || in_stripped_region(el)
}

fn in_stripped_region(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| STRIP_TAGS.contains(&ancestor.value().name()))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn collect_blocks(region: ElementRef<'_>) -> Vec<String> {
    region
        .select(&BLOCK_SELECTOR)
        .filter(|el| !in_stripped_region(*el))
        .filter_map(|el| {
            let text = element_text(el);
            (text.chars().count() > MIN_BLOCK_CHARS).then_some(text)
        })
        .collect()
}

fn collect_images(region: ElementRef<'_>, page_url: &Url) -> Vec<ArticleImage> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut images = Vec::new();

    for img in region.select(&IMG_SELECTOR) {
        if images.len() >= MAX_IMAGES {
            break;
        }
        if in_stripped_region(img) {
            continue;
        }
        let Some(src) = image_src(img) else { continue };
        if src.starts_with("data:") || src.to_lowercase().contains("pixel") {
            continue;
        }
        let Ok(resolved) = page_url.join(src) else {
            continue;
        };
        let url = resolved.to_string();
        if seen.contains(&url) || is_tracking_image(img, &url) {
            continue;
        }
        if url.to_lowercase().contains("avatar") {
            continue;
        }

        let alt = truncate_chars(img.value().attr("alt").unwrap_or("").trim(), MAX_IMAGE_TEXT_CHARS)
            .to_string();
        let title =
            truncate_chars(img.value().attr("title").unwrap_or("").trim(), MAX_IMAGE_TEXT_CHARS)
                .to_string();
        let kind = classify_image(&alt, &title, &url);
        let caption = find_caption(img);

        seen.insert(url.clone());
        images.push(ArticleImage {
            url,
            alt,
            title,
            width: img.value().attr("width").map(str::to_string),
            height: img.value().attr("height").map(str::to_string),
            kind,
            caption,
        });
    }

    images
}

/// First usable source attribute, covering the common lazy-load variants.
fn image_src(img: ElementRef<'_>) -> Option<&str> {
    IMAGE_SRC_ATTRS
        .iter()
        .find_map(|attr| img.value().attr(attr).map(str::trim).filter(|s| !s.is_empty()))
}

/// Tracking pixels declare themselves through a 1x1 size or a telltale URL.
fn is_tracking_image(img: ElementRef<'_>, url: &str) -> bool {
    if img.value().attr("width") == Some("1") || img.value().attr("height") == Some("1") {
        return true;
    }
    let lowered = url.to_lowercase();
    TRACKING_URL_MARKERS.iter().any(|marker| lowered.contains(marker))
}

fn classify_image(alt: &str, title: &str, url: &str) -> ImageKind {
    let label = format!("{} {}", alt, title).to_lowercase();
    let url_lower = url.to_lowercase();

    if ["logo", "brand", "icon"].iter().any(|k| label.contains(k)) {
        ImageKind::Logo
    } else if ["screenshot", "screen", "ui", "interface"].iter().any(|k| label.contains(k)) {
        ImageKind::Screenshot
    } else if ["diagram", "architecture", "chart", "graph", "flow"]
        .iter()
        .any(|k| label.contains(k))
    {
        ImageKind::Diagram
    } else if ["code", "snippet", "example"].iter().any(|k| label.contains(k)) {
        ImageKind::CodeExample
    } else if ["banner", "hero", "header"].iter().any(|k| url_lower.contains(k)) {
        ImageKind::Banner
    } else {
        ImageKind::ContentImage
    }
}

/// Caption from an enclosing figure, or a short paragraph right after the
/// image.
fn find_caption(img: ElementRef<'_>) -> String {
    if let Some(parent) = img.parent().and_then(ElementRef::wrap) {
        if parent.value().name() == "figure" {
            if let Some(figcaption) = parent.select(&FIGCAPTION_SELECTOR).next() {
                let text = element_text(figcaption);
                if !text.is_empty() {
                    return truncate_chars(&text, MAX_CAPTION_CHARS).to_string();
                }
            }
        }
    }

    if let Some(next) = img.next_siblings().find_map(ElementRef::wrap) {
        if next.value().name() == "p" {
            let text = element_text(next);
            if text.chars().count() < MAX_SIBLING_CAPTION_CHARS {
                return truncate_chars(&text, MAX_CAPTION_CHARS).to_string();
            }
        }
    }

    String::new()
}

fn count_code_snippets(region: ElementRef<'_>) -> usize {
    region
        .select(&CODE_SELECTOR)
        .filter(|el| !in_stripped_region(*el))
        .filter(|el| {
            el.text().collect::<String>().trim().chars().count() > MIN_SNIPPET_CHARS
        })
        .count()
}
