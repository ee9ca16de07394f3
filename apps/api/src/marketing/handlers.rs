//! Axum route handlers for the generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::analyzer::AnalysisResult;
use crate::errors::AppError;
use crate::llm_client::{ApiKeys, Provider};
use crate::marketing::generator::{EmailContent, Generator, Persona, DEFAULT_PLATFORM};
use crate::models::json::AppJson;
use crate::models::response::ApiResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub context: Option<String>,
    #[serde(default)]
    pub provider: Provider,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub prompt: Option<String>,
    pub content_type: Option<String>,
    pub platform: Option<String>,
    pub tone: Option<String>,
    #[serde(default)]
    pub provider: Provider,
    pub url: Option<String>,
}

/// The slice of an analysis echoed back with generated content.
#[derive(Debug, Serialize)]
pub struct ContentAnalysisSummary {
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub content: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub url_analysis: Option<ContentAnalysisSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRequest {
    pub prompt: Option<String>,
    pub email_type: Option<String>,
    pub brand_info: Option<String>,
    #[serde(default)]
    pub provider: Provider,
    pub url: Option<String>,
}

/// The slice of an analysis echoed back with a generated email.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailAnalysisSummary {
    pub title: String,
    pub description: String,
    pub brand_colors: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    #[serde(flatten)]
    pub email: EmailContent,
    pub email_type: String,
    pub url_analysis: Option<EmailAnalysisSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PersonaRequest {
    pub description: Option<String>,
    #[serde(default)]
    pub provider: Provider,
}

const CONTENT_SUMMARY_KEYWORDS: usize = 5;
const EMAIL_SUMMARY_COLORS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    keys: ApiKeys,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, AppError> {
    let message = required(request.message, "Message is required")?;
    let context = request.context.unwrap_or_default();

    let response = Generator::new(&state.llm, &keys, request.provider)
        .chat_response(&message, &context)
        .await?;

    Ok(Json(ApiResponse::success(
        ChatResponse { response },
        "Chat response generated successfully",
    )))
}

/// POST /api/content/generate
///
/// When `url` is given the page is analyzed first; a failed analysis is
/// logged and generation continues without it.
pub async fn handle_generate_content(
    State(state): State<AppState>,
    keys: ApiKeys,
    AppJson(request): AppJson<ContentRequest>,
) -> Result<Json<ApiResponse<ContentResponse>>, AppError> {
    let prompt = required(request.prompt, "Prompt is required")?;
    let content_type = required(request.content_type, "Content type is required")?;

    let analysis = optional_analysis(&state, request.url.as_deref()).await;
    let platform = request
        .platform
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PLATFORM);

    let content = Generator::new(&state.llm, &keys, request.provider)
        .marketing_content(
            &prompt,
            &content_type,
            platform,
            request.tone.as_deref(),
            analysis.as_ref(),
        )
        .await?;

    let url_analysis = analysis.map(|a| ContentAnalysisSummary {
        title: a.title,
        description: a.description,
        keywords: a.keywords.into_iter().take(CONTENT_SUMMARY_KEYWORDS).collect(),
    });

    Ok(Json(ApiResponse::success(
        ContentResponse {
            content,
            content_type,
            platform: request.platform,
            url_analysis,
        },
        "Content generated successfully",
    )))
}

/// POST /api/email/generate
pub async fn handle_generate_email(
    State(state): State<AppState>,
    keys: ApiKeys,
    AppJson(request): AppJson<EmailRequest>,
) -> Result<Json<ApiResponse<EmailResponse>>, AppError> {
    let prompt = required(request.prompt, "Prompt is required")?;
    let email_type = required(request.email_type, "Email type is required")?;
    let brand_info = request.brand_info.unwrap_or_default();

    let analysis = optional_analysis(&state, request.url.as_deref()).await;

    let email = Generator::new(&state.llm, &keys, request.provider)
        .email_content(&prompt, &email_type, &brand_info, analysis.as_ref())
        .await?;

    let url_analysis = analysis.map(|a| EmailAnalysisSummary {
        title: a.title,
        description: a.description,
        brand_colors: a.brand_colors.into_iter().take(EMAIL_SUMMARY_COLORS).collect(),
    });

    Ok(Json(ApiResponse::success(
        EmailResponse {
            email,
            email_type,
            url_analysis,
        },
        "Email generated successfully",
    )))
}

/// POST /api/persona/generate
pub async fn handle_generate_persona(
    State(state): State<AppState>,
    keys: ApiKeys,
    AppJson(request): AppJson<PersonaRequest>,
) -> Result<Json<ApiResponse<Persona>>, AppError> {
    let description = required(request.description, "Description is required")?;

    let persona = Generator::new(&state.llm, &keys, request.provider)
        .persona(&description)
        .await?;

    Ok(Json(ApiResponse::success(
        persona,
        "Persona generated successfully",
    )))
}

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

async fn optional_analysis(state: &AppState, url: Option<&str>) -> Option<AnalysisResult> {
    let raw = url.filter(|u| !u.is_empty())?;

    let parsed = match Url::parse(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Ignoring unparseable URL {raw:?}: {e}");
            return None;
        }
    };

    match state.analyzer.analyze(&parsed).await {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            warn!("URL analysis failed, continuing without it: {e}");
            None
        }
    }
}
