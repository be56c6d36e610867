//! Rate limiting: sliding-window quotas keyed by client address.
//!
//! `AppState` holds an `Arc<dyn RateLimiter>`: Redis when `REDIS_URL` is set,
//! otherwise the in-process limiter (limits then apply per process).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;
use thiserror::Error;

mod memory;
mod redis_store;

pub use memory::InMemoryRateLimiter;
pub use redis_store::RedisRateLimiter;

/// Identity shared by every client that arrives without a forwarded address.
pub const FALLBACK_CLIENT_ID: &str = "127.0.0.1";
const FORWARDED_FOR: &str = "x-forwarded-for";

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// A named limiter with its own window/threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimiterScope {
    Analyze,
    Generate,
}

impl LimiterScope {
    pub fn max_requests(self) -> u32 {
        match self {
            LimiterScope::Analyze => 2,
            LimiterScope::Generate => 3,
        }
    }

    pub fn window(self) -> Duration {
        Duration::from_secs(60)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LimiterScope::Analyze => "analyze",
            LimiterScope::Generate => "generate",
        }
    }
}

impl fmt::Display for LimiterScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers allow/deny for one request. A denial must not consume quota.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn allow(&self, client_id: &str, scope: LimiterScope) -> Result<bool, RateLimitError>;
}

/// Derives the client identity from the first `x-forwarded-for` entry.
pub fn client_id(headers: &HeaderMap) -> String {
    headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| {
            tracing::debug!("no {FORWARDED_FOR} header; using shared fallback identity");
            FALLBACK_CLIENT_ID.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_scope_thresholds() {
        assert_eq!(LimiterScope::Analyze.max_requests(), 2);
        assert_eq!(LimiterScope::Generate.max_requests(), 3);
        assert_eq!(LimiterScope::Analyze.window(), Duration::from_secs(60));
    }

    #[test]
    fn test_client_id_uses_first_forwarded_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.7, 10.0.0.1"),
        );
        assert_eq!(client_id(&headers), "203.0.113.7");
    }

    #[test]
    fn test_client_id_fallback() {
        assert_eq!(client_id(&HeaderMap::new()), FALLBACK_CLIENT_ID);

        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("  "));
        assert_eq!(client_id(&headers), FALLBACK_CLIENT_ID);
    }
}
