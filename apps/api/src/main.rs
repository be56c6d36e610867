mod analysis;
mod config;
mod errors;
mod generation;
mod llm_client;
mod normalizer;
mod pipeline;
mod rate_limit;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::rate_limit::{InMemoryRateLimiter, RateLimiter, RedisRateLimiter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Radar API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = GeminiClient::new(config.gemini_api_key.clone(), &config.gemini_api_base)
        .context("Failed to build Gemini HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize rate limiter
    let rate_limiter = build_rate_limiter(&config).await?;

    info!(
        "Analysis schema: {}, upload limit: {} bytes",
        config.analysis_schema, config.max_upload_bytes
    );

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        rate_limiter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // dashboard is served from a separate origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis when `REDIS_URL` is set; otherwise an in-process limiter.
async fn build_rate_limiter(config: &Config) -> Result<Arc<dyn RateLimiter>> {
    match &config.redis_url {
        Some(url) => {
            let limiter = RedisRateLimiter::connect(url, config.redis_token.as_deref())
                .await
                .context("Failed to connect rate limiter to Redis")?;
            Ok(Arc::new(limiter))
        }
        None => {
            warn!("REDIS_URL not set; rate limits are enforced per process only");
            Ok(Arc::new(InMemoryRateLimiter::new()))
        }
    }
}
