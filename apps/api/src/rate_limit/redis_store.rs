use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{IntoConnectionInfo, Script};
use tracing::info;
use uuid::Uuid;

use super::{LimiterScope, RateLimitError, RateLimiter};

/// Sliding-window log over a sorted set, scored by admission time in ms.
/// Evict, count and admit run as one script so concurrent requests cannot overshoot.
/// Returns 1 when admitted, 0 when denied; a denial writes nothing.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
if redis.call('ZCARD', key) < limit then
  redis.call('ZADD', key, now, ARGV[4])
  redis.call('PEXPIRE', key, window)
  return 1
end
return 0
"#;

const KEY_PREFIX: &str = "ratelimit";

/// Redis-backed limiter shared by every instance of the service.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    script: Script,
}

impl RedisRateLimiter {
    /// Connects to `url`. When `token` is set it is used as the AUTH password.
    pub async fn connect(url: &str, token: Option<&str>) -> Result<Self, RateLimitError> {
        let mut info = url.into_connection_info()?;
        if let Some(token) = token {
            info.redis.password = Some(token.to_string());
        }

        let client = redis::Client::open(info)?;
        let conn = ConnectionManager::new(client).await?;
        info!("Redis rate limiter connected");

        Ok(Self {
            conn,
            script: Script::new(SLIDING_WINDOW_SCRIPT),
        })
    }
}

fn window_key(scope: LimiterScope, client_id: &str) -> String {
    format!("{KEY_PREFIX}:{scope}:{client_id}")
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn allow(&self, client_id: &str, scope: LimiterScope) -> Result<bool, RateLimitError> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let window_ms = scope.window().as_millis() as i64;
        let member = format!("{now_ms}-{}", Uuid::new_v4());

        let mut conn = self.conn.clone();
        let admitted: i64 = self
            .script
            .key(window_key(scope, client_id))
            .arg(now_ms)
            .arg(window_ms)
            .arg(scope.max_requests())
            .arg(member)
            .invoke_async(&mut conn)
            .await?;

        Ok(admitted == 1)
    }
}
