//! Axum route handler for the Generation API.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::generation::models::{GenerateRequest, RewriteResponse};
use crate::generation::prompts::build_generation_prompt;
use crate::normalizer::{normalize_interview, normalize_plain};
use crate::pipeline::{enforce_rate_limit, invalid_input, invoke_model, reply_rejected};
use crate::rate_limit::LimiterScope;
use crate::state::AppState;

/// POST /api/generate
///
/// Body: `{ "type": "rewrite" | "interview", "context": {...} }`.
/// The body is parsed only after the rate check, so a malformed request still costs quota.
/// `rewrite` answers `{ "result": text }`; `interview` answers the 3 questions as a bare array.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    enforce_rate_limit(state.rate_limiter.as_ref(), &headers, LimiterScope::Generate).await?;

    let request: GenerateRequest = serde_json::from_slice(&body)
        .map_err(|e| invalid_input(None, format!("Invalid generate request: {e}")))?;
    validate(&request)?;

    let action = request.action();
    let prompt = build_generation_prompt(&request);
    let raw = invoke_model(state.llm.as_ref(), action, &prompt, None).await?;

    let response = match request {
        GenerateRequest::Rewrite(_) => {
            let result = normalize_plain(&raw).map_err(|e| reply_rejected(action, &raw, e))?;
            Json(RewriteResponse { result }).into_response()
        }
        GenerateRequest::Interview(_) => {
            let questions =
                normalize_interview(&raw).map_err(|e| reply_rejected(action, &raw, e))?;
            Json(questions).into_response()
        }
    };

    info!(action = %action, "generation complete");
    Ok(response)
}

fn validate(request: &GenerateRequest) -> Result<(), AppError> {
    let action = Some(request.action());
    match request {
        GenerateRequest::Rewrite(ctx) => {
            if ctx.jd.trim().is_empty() {
                return Err(invalid_input(action, "context.jd cannot be empty"));
            }
            if ctx.current_text.trim().is_empty() {
                return Err(invalid_input(action, "context.currentText cannot be empty"));
            }
        }
        GenerateRequest::Interview(ctx) => {
            if ctx.jd.trim().is_empty() {
                return Err(invalid_input(action, "context.jd cannot be empty"));
            }
        }
    }
    Ok(())
}
