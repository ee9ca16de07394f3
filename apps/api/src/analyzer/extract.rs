//! Field extraction from a parsed page.
//!
//! Title, description, author and publish date are each an ordered chain of
//! strategies; the first one producing a non-empty value wins.

use scraper::{ElementRef, Html, Selector};
use url::Url;

pub const UNTITLED: &str = "Untitled";
pub const MAX_CONTENT_CHARS: usize = 5000;
pub const MAX_IMAGES: usize = 10;
const PARAGRAPH_DESCRIPTION_CHARS: usize = 200;

/// Common "article body" containers, probed in order.
const CONTENT_SELECTORS: [&str; 6] = [
    "article",
    ".content",
    ".post-content",
    ".entry-content",
    "main",
    ".main-content",
];

type Strategy = fn(&Html) -> Option<String>;

const TITLE_CHAIN: &[Strategy] = &[title_tag, og_title, first_heading];
const DESCRIPTION_CHAIN: &[Strategy] = &[meta_description, og_description, first_paragraph];
const AUTHOR_CHAIN: &[Strategy] = &[meta_author, article_author, author_hook];
const PUBLISH_DATE_CHAIN: &[Strategy] = &[published_time, meta_date, time_datetime];

pub fn title(doc: &Html) -> String {
    first_non_empty(doc, TITLE_CHAIN).unwrap_or_else(|| UNTITLED.to_string())
}

pub fn description(doc: &Html) -> String {
    first_non_empty(doc, DESCRIPTION_CHAIN).unwrap_or_default()
}

pub fn author(doc: &Html) -> Option<String> {
    first_non_empty(doc, AUTHOR_CHAIN)
}

pub fn publish_date(doc: &Html) -> Option<String> {
    first_non_empty(doc, PUBLISH_DATE_CHAIN)
}

pub fn meta_keywords(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[name="keywords"]"#)
}

/// Text of the first content container that exists, falling back to `<body>`.
/// Whitespace runs collapse to single spaces; the result is capped at
/// `MAX_CONTENT_CHARS` characters.
pub fn main_content(doc: &Html) -> String {
    let container_text = CONTENT_SELECTORS
        .iter()
        .find_map(|css| joined_text(doc, css))
        .filter(|text| !text.trim().is_empty());

    let raw = container_text
        .or_else(|| joined_text(doc, "body"))
        .unwrap_or_default();

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_CONTENT_CHARS).to_string()
}

/// Absolute URLs of `<img src>` in document order. Sources that cannot be
/// resolved against `page_url` are skipped.
pub fn images(doc: &Html, page_url: &Url) -> Vec<String> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    doc.select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .filter_map(|src| page_url.join(src).ok())
        .map(String::from)
        .take(MAX_IMAGES)
        .collect()
}

/// Returns the leading `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn first_non_empty(doc: &Html, chain: &[Strategy]) -> Option<String> {
    chain
        .iter()
        .filter_map(|strategy| strategy(doc))
        .find(|value| !value.is_empty())
}

// ── strategies ──────────────────────────────────────────────────────────────

fn title_tag(doc: &Html) -> Option<String> {
    joined_text(doc, "title").map(|t| t.trim().to_string())
}

fn og_title(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[property="og:title"]"#)
}

fn first_heading(doc: &Html) -> Option<String> {
    first_text(doc, "h1")
}

fn meta_description(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[name="description"]"#)
}

fn og_description(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[property="og:description"]"#)
}

fn first_paragraph(doc: &Html) -> Option<String> {
    first_text(doc, "p").map(|t| truncate_chars(&t, PARAGRAPH_DESCRIPTION_CHARS).to_string())
}

fn meta_author(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[name="author"]"#)
}

fn article_author(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[property="article:author"]"#)
}

fn author_hook(doc: &Html) -> Option<String> {
    first_text(doc, ".author")
}

fn published_time(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[property="article:published_time"]"#)
}

fn meta_date(doc: &Html) -> Option<String> {
    meta_content(doc, r#"meta[name="date"]"#)
}

fn time_datetime(doc: &Html) -> Option<String> {
    select_first(doc, "time")?
        .value()
        .attr("datetime")
        .map(str::to_string)
}

// ── helpers ─────────────────────────────────────────────────────────────────

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

/// `content` attribute of the first element matching `css`.
fn meta_content(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css)?
        .value()
        .attr("content")
        .map(str::to_string)
}

/// Trimmed text of the first element matching `css`.
fn first_text(doc: &Html, css: &str) -> Option<String> {
    select_first(doc, css).map(|el| el.text().collect::<String>().trim().to_string())
}

/// Concatenated text of every element matching `css`; `None` when nothing matches.
fn joined_text(doc: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    let mut matches = doc.select(&selector).peekable();
    matches.peek()?;
    Some(matches.flat_map(|el| el.text()).collect())
}
