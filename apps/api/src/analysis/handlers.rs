//! Axum route handler for the Analysis API.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::{HeaderMap, StatusCode},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::analysis::models::AnalysisResult;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::llm_client::Document;
use crate::normalizer::normalize_analysis;
use crate::pipeline::{enforce_rate_limit, invalid_input, invoke_model, reply_rejected, ActionKind};
use crate::rate_limit::LimiterScope;
use crate::state::AppState;

const MISSING_INPUT: &str = "Missing file or JD";

/// The two inputs of an analysis, both present and non-empty.
#[derive(Debug)]
struct AnalysisForm {
    resume: Bytes,
    jd: String,
}

/// POST /api/analyze
///
/// Multipart fields: `resume` (PDF file) and `jd` (text).
/// Flow: rate check → validate → prompt + Gemini (PDF attached) → strict parse.
pub async fn handle_analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    enforce_rate_limit(state.rate_limiter.as_ref(), &headers, LimiterScope::Analyze).await?;

    let multipart = multipart.map_err(|e| {
        invalid_input(
            Some(ActionKind::Analyze),
            format!("Expected a multipart form: {e}"),
        )
    })?;
    let form = read_analysis_form(multipart, state.config.max_upload_bytes).await?;

    let prompt = build_analysis_prompt(&form.jd, state.config.analysis_schema);
    let document = Document::pdf(form.resume);
    let raw = invoke_model(
        state.llm.as_ref(),
        ActionKind::Analyze,
        &prompt,
        Some(&document),
    )
    .await?;

    let result =
        normalize_analysis(&raw).map_err(|e| reply_rejected(ActionKind::Analyze, &raw, e))?;

    info!(
        score = result.score,
        match_level = ?result.match_level,
        schema = %state.config.analysis_schema,
        "analysis complete"
    );
    Ok(Json(result))
}

/// Maps a multipart read failure: a body over the configured limit is a 413,
/// anything else is a malformed request.
fn multipart_failure(e: MultipartError, context: &str, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(action = %ActionKind::Analyze, limit, "upload exceeds body limit");
        return AppError::PayloadTooLarge(format!("Upload exceeds the {limit} byte limit"));
    }
    invalid_input(Some(ActionKind::Analyze), format!("{context}: {e}"))
}

/// Reads `resume` and `jd` from the form; other fields are skipped.
async fn read_analysis_form(mut multipart: Multipart, limit: usize) -> Result<AnalysisForm, AppError> {
    let mut resume: Option<Bytes> = None;
    let mut jd: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_failure(e, "Malformed multipart body", limit))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("resume") => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_failure(e, "Failed to read resume", limit))?;
                resume = Some(data);
            }
            Some("jd") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_failure(e, "Failed to read jd", limit))?;
                jd = Some(text);
            }
            _ => {}
        }
    }

    match (resume, jd) {
        (Some(resume), Some(jd)) if !resume.is_empty() && !jd.trim().is_empty() => {
            Ok(AnalysisForm { resume, jd })
        }
        _ => Err(invalid_input(Some(ActionKind::Analyze), MISSING_INPUT)),
    }
}
