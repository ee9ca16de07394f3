use axum::{extract::State, Json};
use serde::Deserialize;
use url::Url;

use crate::analyzer::AnalysisResult;
use crate::errors::AppError;
use crate::llm_client::ApiKeys;
use crate::models::json::AppJson;
use crate::models::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    pub url: Option<String>,
}

/// POST /api/analyze/url
///
/// Requires client keys like every other API route, although the analysis
/// itself makes no vendor call.
pub async fn handle_analyze_url(
    State(state): State<AppState>,
    _keys: ApiKeys,
    AppJson(request): AppJson<AnalyzeUrlRequest>,
) -> Result<Json<ApiResponse<AnalysisResult>>, AppError> {
    let url = parse_target_url(request.url.as_deref())?;
    let analysis = state.analyzer.analyze(&url).await?;
    Ok(Json(ApiResponse::success(
        analysis,
        "URL analyzed successfully",
    )))
}

/// Validates the caller-supplied URL before any fetch happens.
pub fn parse_target_url(raw: Option<&str>) -> Result<Url, AppError> {
    let raw = raw
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("URL is required".to_string()))?;
    Url::parse(raw).map_err(|_| AppError::Validation("Invalid URL format".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_or_empty_url_is_required() {
        assert_eq!(message(parse_target_url(None).unwrap_err()), "URL is required");
        assert_eq!(message(parse_target_url(Some("")).unwrap_err()), "URL is required");
    }

    #[test]
    fn test_relative_url_is_invalid() {
        let err = parse_target_url(Some("/just/a/path")).unwrap_err();
        assert_eq!(message(err), "Invalid URL format");
    }

    #[test]
    fn test_absolute_url_is_accepted() {
        let url = parse_target_url(Some("https://example.com/blog?id=1")).unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }
}
