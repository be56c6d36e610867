use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{LimiterScope, RateLimitError, RateLimiter};

/// In-process sliding-window log. One deque of admission times per (scope, client).
#[derive(Default)]
pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<(LimiterScope, String), VecDeque<Instant>>>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn allow(&self, client_id: &str, scope: LimiterScope) -> Result<bool, RateLimitError> {
        let now = Instant::now();
        let window = scope.window();
        let mut windows = self.windows.lock().await;

        // Drop clients whose whole log has aged out.
        windows.retain(|(s, _), log| {
            log.back()
                .is_some_and(|last| now.duration_since(*last) < s.window())
        });

        let log = windows
            .entry((scope, client_id.to_string()))
            .or_default();
        while log
            .front()
            .is_some_and(|t| now.duration_since(*t) >= window)
        {
            log.pop_front();
        }

        if log.len() >= scope.max_requests() as usize {
            return Ok(false);
        }
        log.push_back(now);
        Ok(true)
    }
}
