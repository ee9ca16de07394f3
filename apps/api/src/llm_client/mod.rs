/// LLM client: the single point of entry for all vendor model calls.
///
/// Keys are never configured server-side: each request carries the caller's
/// own OpenAI / Anthropic key (see `keys::ApiKeys`). No retries are attempted;
/// a failed call surfaces immediately.
use std::fmt;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod keys;
pub mod prompts;

pub use keys::ApiKeys;

pub const OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
const OPENAI_PROBE_MODEL: &str = "gpt-3.5-turbo";
const ANTHROPIC_PROBE_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const MAX_TOKENS: u32 = 4000;
const TEMPERATURE: f32 = 0.7;
const PROBE_MAX_TOKENS: u32 = 5;
const PROBE_PROMPT: &str = "Hello";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Returned in place of model text when a reply carries none.
pub const NO_RESPONSE: &str = "No response generated";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAi,
    Anthropic,
}

impl Provider {
    /// Human-facing vendor name.
    pub fn vendor_name(self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => f.write_str("openai"),
            Provider::Anthropic => f.write_str("anthropic"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No valid API key found for provider: {0}")]
    MissingKey(Provider),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl LlmError {
    /// Vendor HTTP status, when the vendor answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            LlmError::MissingKey(_) => None,
        }
    }
}

/// One completion call, independent of vendor.
struct Completion<'a> {
    model: &'a str,
    prompt: &'a str,
    system: Option<&'a str>,
    max_tokens: u32,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

/// Error body shape shared by both vendors: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct VendorError {
    error: VendorErrorBody,
}

#[derive(Debug, Deserialize)]
struct VendorErrorBody {
    message: String,
}

/// Thin client over the OpenAI Chat Completions and Anthropic Messages APIs.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    openai_base: String,
    anthropic_base: String,
}

impl LlmClient {
    /// `openai_base` / `anthropic_base` are API roots such as
    /// `https://api.openai.com/v1`; a trailing slash is ignored.
    pub fn new(
        openai_base: impl Into<String>,
        anthropic_base: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            openai_base: trim_base(openai_base.into()),
            anthropic_base: trim_base(anthropic_base.into()),
        })
    }

    /// Sends `prompt` to `provider` using the caller's key and returns the reply text.
    pub async fn generate(
        &self,
        keys: &ApiKeys,
        provider: Provider,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, LlmError> {
        let key = keys
            .key_for(provider)
            .ok_or(LlmError::MissingKey(provider))?;

        match provider {
            Provider::OpenAi => {
                let completion = Completion {
                    model: OPENAI_MODEL,
                    prompt,
                    system,
                    max_tokens: MAX_TOKENS,
                    temperature: Some(TEMPERATURE),
                };
                self.call_openai(key, &completion).await
            }
            Provider::Anthropic => {
                let completion = Completion {
                    model: ANTHROPIC_MODEL,
                    prompt,
                    system: Some(system.unwrap_or(prompts::DEFAULT_SYSTEM)),
                    max_tokens: MAX_TOKENS,
                    temperature: Some(TEMPERATURE),
                };
                self.call_anthropic(key, &completion).await
            }
        }
    }

    /// Checks that `api_key` is accepted by `provider` with a tiny completion.
    pub async fn validate_key(&self, provider: Provider, api_key: &str) -> Result<(), LlmError> {
        let model = match provider {
            Provider::OpenAi => OPENAI_PROBE_MODEL,
            Provider::Anthropic => ANTHROPIC_PROBE_MODEL,
        };
        let completion = Completion {
            model,
            prompt: PROBE_PROMPT,
            system: None,
            max_tokens: PROBE_MAX_TOKENS,
            temperature: None,
        };

        match provider {
            Provider::OpenAi => self.call_openai(api_key, &completion).await?,
            Provider::Anthropic => self.call_anthropic(api_key, &completion).await?,
        };
        Ok(())
    }

    async fn call_openai(&self, key: &str, completion: &Completion<'_>) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = completion.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: completion.prompt,
        });

        let body = OpenAiRequest {
            model: completion.model,
            messages,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
        };

        let request = self
            .client
            .post(format!("{}/chat/completions", self.openai_base))
            .bearer_auth(key)
            .json(&body);

        let response: OpenAiResponse = send_json(request, Provider::OpenAi).await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }

    async fn call_anthropic(
        &self,
        key: &str,
        completion: &Completion<'_>,
    ) -> Result<String, LlmError> {
        let body = AnthropicRequest {
            model: completion.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            system: completion.system,
            messages: vec![ChatMessage {
                role: "user",
                content: completion.prompt,
            }],
        };

        let request = self
            .client
            .post(format!("{}/messages", self.anthropic_base))
            .header("x-api-key", key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        let response: AnthropicResponse = send_json(request, Provider::Anthropic).await?;

        // Only the first block counts, and only when it is text.
        Ok(response
            .content
            .into_iter()
            .next()
            .filter(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    provider: Provider,
) -> Result<T, LlmError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{} API returned {}: {}", provider.vendor_name(), status, body);
        let message = serde_json::from_str::<VendorError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(LlmError::Api {
            status: status.as_u16(),
            message,
        });
    }

    debug!("{} call succeeded", provider.vendor_name());
    Ok(response.json().await?)
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => {
            let stripped = stripped.trim_start();
            stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped)
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_vendor_stub, VALID_KEY};

    fn keys(openai: Option<&str>, anthropic: Option<&str>) -> ApiKeys {
        ApiKeys {
            openai: openai.map(str::to_string),
            anthropic: anthropic.map(str::to_string),
        }
    }

    #[test]
    fn test_provider_serde_is_lowercase() {
        let p: Provider = serde_json::from_str(r#""anthropic""#).unwrap();
        assert_eq!(p, Provider::Anthropic);
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), r#""openai""#);
        assert_eq!(Provider::default(), Provider::OpenAi);
    }

    #[test]
    fn test_missing_key_message_names_provider() {
        let err = LlmError::MissingKey(Provider::Anthropic);
        assert_eq!(err.to_string(), "No valid API key found for provider: anthropic");
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"} ";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_trailing_slash_on_base_is_ignored() {
        let client = LlmClient::new("http://localhost:9/v1/", "http://localhost:9/").unwrap();
        assert_eq!(client.openai_base, "http://localhost:9/v1");
        assert_eq!(client.anthropic_base, "http://localhost:9");
    }

    #[tokio::test]
    async fn test_generate_openai_returns_reply_text() {
        let base = spawn_vendor_stub("openai says hi").await;
        let client = LlmClient::new(&base, &base).unwrap();
        let text = client
            .generate(&keys(Some(VALID_KEY), None), Provider::OpenAi, "Hello", Some("sys"))
            .await
            .unwrap();
        assert_eq!(text, "openai says hi");
    }

    #[tokio::test]
    async fn test_generate_anthropic_returns_reply_text() {
        let base = spawn_vendor_stub("claude says hi").await;
        let client = LlmClient::new(&base, &base).unwrap();
        let text = client
            .generate(&keys(None, Some(VALID_KEY)), Provider::Anthropic, "Hello", None)
            .await
            .unwrap();
        assert_eq!(text, "claude says hi");
    }

    #[tokio::test]
    async fn test_generate_without_key_for_provider_fails_fast() {
        let client = LlmClient::new("http://127.0.0.1:1", "http://127.0.0.1:1").unwrap();
        let err = client
            .generate(&keys(Some(VALID_KEY), None), Provider::Anthropic, "Hello", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingKey(Provider::Anthropic)));
    }

    #[tokio::test]
    async fn test_rejected_key_maps_to_api_error() {
        let base = spawn_vendor_stub("unused").await;
        let client = LlmClient::new(&base, &base).unwrap();
        let err = client
            .validate_key(Provider::OpenAi, "sk-wrong")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_validate_key_accepts_valid_key() {
        let base = spawn_vendor_stub("ok").await;
        let client = LlmClient::new(&base, &base).unwrap();
        client
            .validate_key(Provider::Anthropic, VALID_KEY)
            .await
            .unwrap();
    }
}
