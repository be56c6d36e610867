//! Labels for the request pipeline, used to tag log lines.
//!
//! analyze:  received → rate_check → validate → model_invoke → normalize → responded
//! generate: received → rate_check → validate → model_invoke → normalize → responded
//!
//! Any stage may end the request; nothing is retried.

use std::fmt;

use axum::http::HeaderMap;
use tracing::{error, warn};

use crate::errors::AppError;
use crate::llm_client::{AiGateway, Document};
use crate::normalizer::NormalizeError;
use crate::rate_limit::{client_id, LimiterScope, RateLimiter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Analyze,
    Rewrite,
    Interview,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Analyze => "analyze",
            ActionKind::Rewrite => "rewrite",
            ActionKind::Interview => "interview",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    RateCheck,
    Validate,
    ModelInvoke,
    Normalize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::RateCheck => "rate_check",
            Stage::Validate => "validate",
            Stage::ModelInvoke => "model_invoke",
            Stage::Normalize => "normalize",
        })
    }
}

/// rate_check: asks the limiter for this client; a denial ends the request with 429.
pub async fn enforce_rate_limit(
    limiter: &dyn RateLimiter,
    headers: &HeaderMap,
    scope: LimiterScope,
) -> Result<(), AppError> {
    let client = client_id(headers);
    let allowed = limiter.allow(&client, scope).await.map_err(|e| {
        error!(%scope, stage = %Stage::RateCheck, "rate limiter unavailable: {e}");
        AppError::Internal(anyhow::Error::new(e).context("rate limit check failed"))
    })?;

    if !allowed {
        warn!(%scope, client = %client, stage = %Stage::RateCheck, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(())
}

/// validate: logs and builds the 400 for a rejected input.
pub fn invalid_input(action: Option<ActionKind>, message: impl Into<String>) -> AppError {
    let message = message.into();
    warn!(
        action = action.map_or("unknown", ActionKind::as_str),
        stage = %Stage::Validate,
        "rejected request: {message}"
    );
    AppError::Validation(message)
}

/// model_invoke: one call to the gateway, no retry.
pub async fn invoke_model(
    llm: &dyn AiGateway,
    action: ActionKind,
    prompt: &str,
    document: Option<&Document>,
) -> Result<String, AppError> {
    llm.complete(prompt, document)
        .await
        .map_err(|e| AppError::Llm(format!("{action} failed at {}: {e}", Stage::ModelInvoke)))
}

/// normalize: maps a normalizer failure to the generic AI response error.
/// The raw reply stays in the server log.
pub fn reply_rejected(action: ActionKind, raw: &str, err: NormalizeError) -> AppError {
    error!(
        action = %action,
        stage = %Stage::Normalize,
        raw_reply = %raw,
        "model reply rejected: {err}"
    );
    AppError::AiResponse(format!("{action}: {err}"))
}
