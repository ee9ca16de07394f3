//! Client-supplied vendor keys, carried per request in the `X-API-Keys` header.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use super::Provider;
use crate::errors::AppError;

pub const API_KEYS_HEADER: &str = "x-api-keys";

/// JSON object such as `{"openai": "sk-...", "anthropic": "sk-ant-..."}`.
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    pub openai: Option<String>,
    #[serde(default)]
    pub anthropic: Option<String>,
}

impl ApiKeys {
    pub fn key_for(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
        };
        key.filter(|k| !k.is_empty())
    }

    pub fn has_any(&self) -> bool {
        self.key_for(Provider::OpenAi).is_some() || self.key_for(Provider::Anthropic).is_some()
    }

    /// Parses the raw header value. Errors carry the client-facing message.
    pub fn from_header(raw: Option<&[u8]>) -> Result<Self, AppError> {
        let raw = raw.ok_or_else(|| AppError::Validation("API keys are required".to_string()))?;

        let keys: ApiKeys = serde_json::from_slice(raw)
            .map_err(|_| AppError::Validation("Invalid API keys format".to_string()))?;

        if !keys.has_any() {
            return Err(AppError::Validation(
                "At least one API key (OpenAI or Anthropic) is required".to_string(),
            ));
        }
        Ok(keys)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ApiKeys
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(API_KEYS_HEADER).map(|v| v.as_bytes());
        ApiKeys::from_header(raw)
    }
}
