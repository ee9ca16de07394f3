//! Vendor key validation: one tiny completion against the vendor.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{LlmError, Provider};
use crate::models::json::AppJson;
use crate::models::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateKeyRequest {
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
}

/// POST /api/validate/openai
pub async fn handle_validate_openai(
    State(state): State<AppState>,
    AppJson(request): AppJson<ValidateKeyRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    validate(&state, Provider::OpenAi, request).await
}

/// POST /api/validate/anthropic
pub async fn handle_validate_anthropic(
    State(state): State<AppState>,
    AppJson(request): AppJson<ValidateKeyRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    validate(&state, Provider::Anthropic, request).await
}

async fn validate(
    state: &AppState,
    provider: Provider,
    request: ValidateKeyRequest,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let api_key = request
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::Validation("API key is required".to_string()))?;

    state
        .llm
        .validate_key(provider, &api_key)
        .await
        .map_err(|e| {
            warn!("{} validation error: {e}", provider.vendor_name());
            AppError::Validation(rejection_message(provider, &e))
        })?;

    Ok(Json(ApiResponse::message_only(format!(
        "{} API key is valid",
        provider.vendor_name()
    ))))
}

/// Client-facing explanation of why a key was rejected.
fn rejection_message(provider: Provider, err: &LlmError) -> String {
    match err.status() {
        Some(401) => "Invalid API key or insufficient permissions".to_string(),
        Some(429) => "API key rate limit exceeded".to_string(),
        Some(500) => format!("{} service temporarily unavailable", provider.vendor_name()),
        _ => "Invalid API key".to_string(),
    }
}
