//! Shared fixtures for unit and router tests: a canned page fetcher and a
//! local stand-in for the OpenAI and Anthropic endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use url::Url;

use crate::analyzer::{FetchError, PageFetcher, UrlAnalyzer};
use crate::llm_client::LlmClient;
use crate::state::AppState;

/// The only key the vendor stub accepts.
pub const VALID_KEY: &str = "sk-test-valid";

/// Base URL with no listener; any vendor call against it fails to connect.
pub const UNREACHABLE_BASE: &str = "http://127.0.0.1:1";

/// Serves the same markup for every URL, or fails every fetch with a status.
pub struct StaticFetcher {
    html: Option<String>,
    status: u16,
}

impl StaticFetcher {
    pub fn page(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
            status: 200,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self { html: None, status }
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.html.clone().ok_or_else(|| FetchError::Status {
            status: self.status,
            url: url.to_string(),
        })
    }
}

pub fn test_state(fetcher: StaticFetcher, llm_base: &str) -> AppState {
    AppState {
        analyzer: UrlAnalyzer::new(Arc::new(fetcher)),
        llm: LlmClient::new(llm_base, llm_base).unwrap(),
    }
}

/// Starts a vendor stub on an ephemeral port and returns its base URL.
/// Both `/chat/completions` and `/messages` answer with `reply`.
pub async fn spawn_vendor_stub(reply: &'static str) -> String {
    let app = Router::new()
        .route(
            "/chat/completions",
            post(move |headers: HeaderMap| async move { openai_reply(&headers, reply) }),
        )
        .route(
            "/messages",
            post(move |headers: HeaderMap| async move { anthropic_reply(&headers, reply) }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn openai_reply(headers: &HeaderMap, reply: &str) -> (StatusCode, Json<Value>) {
    let expected = format!("Bearer {VALID_KEY}");
    if header(headers, AUTHORIZATION.as_str()) != Some(expected.as_str()) {
        return rejected();
    }
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{ "message": { "role": "assistant", "content": reply } }]
        })),
    )
}

fn anthropic_reply(headers: &HeaderMap, reply: &str) -> (StatusCode, Json<Value>) {
    if header(headers, "x-api-key") != Some(VALID_KEY) {
        return rejected();
    }
    (
        StatusCode::OK,
        Json(json!({ "content": [{ "type": "text", "text": reply }] })),
    )
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn rejected() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "message": "Incorrect API key provided" } })),
    )
}
