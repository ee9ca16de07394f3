//! Content analyzer. Fetches a web page and derives a structured summary
//! (title, description, main text, ranked keywords, brand colors, images).
//!
//! Fetching sits behind the `PageFetcher` trait so the extraction pipeline can
//! be exercised without a network. Extraction itself (`analyze_html`) is
//! synchronous and total: every step has a fallback, so any HTML input yields
//! a result.

pub mod colors;
pub mod extract;
pub mod handlers;
pub mod keywords;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Upper bound on a single page fetch.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Sent as the User-Agent so pages serve their regular desktop markup.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Message shown to API callers whenever a page cannot be analyzed.
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Failed to analyze URL. Please check if the URL is accessible.";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timed out fetching {0}")]
    Timeout(String),

    #[error("Transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },
}

/// Structured summary of a single page. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub title: String,
    pub description: String,
    pub content: String,
    pub keywords: Vec<String>,
    pub brand_colors: Vec<String>,
    pub images: Vec<String>,
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    /// Whitespace-delimited token count of `AnalysisResult::content`.
    pub word_count: usize,
}

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// `PageFetcher` backed by reqwest, with a browser User-Agent and a fixed timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &Url, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: err,
        }
    }
}

/// Fetches pages and turns them into `AnalysisResult`s. Cheap to clone;
/// holds no per-request state, so concurrent calls need no coordination.
#[derive(Clone)]
pub struct UrlAnalyzer {
    fetcher: Arc<dyn PageFetcher>,
}

impl UrlAnalyzer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Analyzer using the real HTTP fetcher.
    pub fn http() -> Result<Self, reqwest::Error> {
        Ok(Self::new(Arc::new(HttpFetcher::new()?)))
    }

    /// Fetches `url` and analyzes it. A failed fetch yields no partial result.
    pub async fn analyze(&self, url: &Url) -> Result<AnalysisResult, FetchError> {
        debug!("Fetching {url} for analysis");
        let html = self.fetcher.fetch(url).await?;

        let result = analyze_html(url, &html);
        info!(
            "Analyzed {url}: {} words, {} keywords, {} images",
            result.metadata.word_count,
            result.keywords.len(),
            result.images.len()
        );
        Ok(result)
    }
}

/// Runs every extraction step over already-fetched markup.
/// `page_url` is the base for resolving relative image sources.
pub fn analyze_html(page_url: &Url, raw_html: &str) -> AnalysisResult {
    let document = Html::parse_document(raw_html);

    let title = extract::title(&document);
    let description = extract::description(&document);
    let content = extract::main_content(&document);
    let meta_keywords = extract::meta_keywords(&document).unwrap_or_default();

    let keywords =
        keywords::extract_keywords(&format!("{content} {title} {description} {meta_keywords}"));

    // Colors come from the unparsed source so inline styles and attributes count.
    let brand_colors = colors::brand_colors(raw_html);
    let images = extract::images(&document, page_url);

    let metadata = PageMetadata {
        author: extract::author(&document),
        publish_date: extract::publish_date(&document),
        word_count: content.split_whitespace().count(),
    };

    AnalysisResult {
        title,
        description,
        content,
        keywords,
        brand_colors,
        images,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticFetcher;

    fn page() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_bare_page_uses_fallbacks() {
        let result = analyze_html(&page(), "<html><head></head><body></body></html>");
        assert_eq!(result.title, "Untitled");
        assert_eq!(result.description, "");
        assert_eq!(result.content, "");
        // The fallback title is part of the keyword text.
        assert_eq!(result.keywords, vec!["untitled"]);
        assert!(result.brand_colors.is_empty());
        assert!(result.images.is_empty());
        assert_eq!(result.metadata.author, None);
        assert_eq!(result.metadata.publish_date, None);
        assert_eq!(result.metadata.word_count, 0);
    }

    #[test]
    fn test_malformed_markup_still_produces_result() {
        let result = analyze_html(&page(), "<div><p>unclosed <b>tags <img src=");
        assert_eq!(result.title, "Untitled");
        assert_eq!(result.description, "unclosed tags");
    }

    #[test]
    fn test_marketing_strategy_scenario() {
        let html = "<html><head><title>Hi</title></head><body><article>Hello world this is \
                    content about marketing strategy marketing strategy marketing</article>\
                    </body></html>";
        let result = analyze_html(&page(), html);

        assert_eq!(result.title, "Hi");
        assert!(result
            .content
            .contains("Hello world this is content about marketing strategy"));
        assert_eq!(result.keywords[0], "marketing");
        assert_eq!(result.keywords[1], "strategy");
        assert_eq!(
            result.metadata.word_count,
            result.content.split_whitespace().count()
        );
        assert_eq!(result.metadata.word_count, 11);
    }

    #[test]
    fn test_caps_hold_for_large_pages() {
        let mut html = String::from("<html><head><style>");
        for i in 0..40 {
            html.push_str(&format!(".c{i} {{ color: #{:06x}; }}\n", i * 4099));
        }
        html.push_str("</style></head><body><article>");
        for i in 0..3000 {
            html.push_str(&format!("word{i} keyword{} ", i % 50));
        }
        html.push_str("</article>");
        for i in 0..30 {
            html.push_str(&format!("<img src=\"/img/{i}.png\">"));
        }
        html.push_str("</body></html>");

        let result = analyze_html(&page(), &html);
        assert!(result.content.chars().count() <= 5000);
        assert_eq!(result.keywords.len(), 20);
        assert_eq!(result.brand_colors.len(), 10);
        assert_eq!(result.images.len(), 10);
        assert_eq!(
            result.metadata.word_count,
            result.content.split_whitespace().count()
        );
    }

    #[test]
    fn test_meta_keywords_feed_keyword_ranking() {
        let html = r#"<html><head><meta name="keywords" content="branding, branding, branding">
            </head><body><p>Short paragraph.</p></body></html>"#;
        let result = analyze_html(&page(), html);
        assert_eq!(result.keywords[0], "branding");
    }

    #[test]
    fn test_serializes_in_camel_case_without_absent_metadata() {
        let result = analyze_html(&page(), "<p>Hello there</p>");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("brandColors").is_some());
        assert_eq!(json["metadata"]["wordCount"], 2);
        assert!(json["metadata"].get("author").is_none());
        assert!(json["metadata"].get("publishDate").is_none());
    }

    #[tokio::test]
    async fn test_analyze_uses_fetched_markup() {
        let analyzer = UrlAnalyzer::new(Arc::new(StaticFetcher::page(
            r#"<title>Launch</title><img src="/img/a.png">"#,
        )));
        let result = analyzer.analyze(&page()).await.unwrap();
        assert_eq!(result.title, "Launch");
        assert_eq!(result.images, vec!["https://example.com/img/a.png"]);
    }

    #[tokio::test]
    async fn test_analyze_propagates_fetch_failure() {
        let analyzer = UrlAnalyzer::new(Arc::new(StaticFetcher::failing(503)));
        let err = analyzer.analyze(&page()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        // Port 1 on loopback has no listener; the connection is refused.
        let analyzer = UrlAnalyzer::http().unwrap();
        let url = Url::parse("http://127.0.0.1:1/").unwrap();
        let err = analyzer.analyze(&url).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::Transport { .. } | FetchError::Timeout(_)
        ));
    }
}
