use crate::analyzer::UrlAnalyzer;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; both members are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: UrlAnalyzer,
    pub llm: LlmClient,
}
