use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::AiGateway;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
/// Clients are built once in `main` from `Config` and never torn down.
#[derive(Clone)]
pub struct AppState {
    /// Gemini in production; a scripted fake in handler tests.
    pub llm: Arc<dyn AiGateway>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub config: Config,
}
