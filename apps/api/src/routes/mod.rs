pub mod health;
pub mod validate;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::analyzer::handlers::handle_analyze_url;
use crate::errors::AppError;
use crate::marketing::handlers;
use crate::state::AppState;

/// Request bodies above this size are rejected before reaching a handler.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Hardening headers added to every response that does not already set them.
/// Resources may be embedded cross-origin so the frontend can load them.
const SECURITY_HEADERS: [(&str, &str); 12] = [
    (
        "content-security-policy",
        "default-src 'self';base-uri 'self';font-src 'self' https: data:;\
         form-action 'self';frame-ancestors 'self';img-src 'self' data:;\
         object-src 'none';script-src 'self';script-src-attr 'none';\
         style-src 'self' https: 'unsafe-inline';upgrade-insecure-requests",
    ),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "cross-origin"),
    ("origin-agent-cluster", "?1"),
    ("referrer-policy", "no-referrer"),
    ("strict-transport-security", "max-age=15552000; includeSubDomains"),
    ("x-content-type-options", "nosniff"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-permitted-cross-domain-policies", "none"),
    ("x-xss-protection", "0"),
];

async fn not_found() -> AppError {
    AppError::NotFound("Endpoint not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze/url", post(handle_analyze_url))
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/content/generate", post(handlers::handle_generate_content))
        .route("/api/email/generate", post(handlers::handle_generate_email))
        .route("/api/persona/generate", post(handlers::handle_generate_persona))
        .route("/api/validate/openai", post(validate::handle_validate_openai))
        .route(
            "/api/validate/anthropic",
            post(validate::handle_validate_anthropic),
        )
        .fallback(not_found);

    SECURITY_HEADERS
        .iter()
        .fold(router, |router, &(name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            ))
        })
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
