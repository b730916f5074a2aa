use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::errors::AuthError;

pub const ACCESS_DENY_PREFIX: &str = "access_deny";
pub const REFRESH_DENY_PREFIX: &str = "refresh_deny";

/// Builds the pool lazily; no connection is attempted until first use.
pub fn create_redis_pool(url: &str) -> Result<Pool, AuthError> {
    Config::from_url(url)
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| AuthError::RedisConnection(e.to_string()))
}

fn deny_key(prefix: &str, jti: &str) -> String {
    format!("{prefix}:{jti}")
}

/// Token blacklist keyed by `jti`, entries expire with the token.
#[derive(Clone)]
pub struct RedisTokenStore {
    pool: Pool,
}

impl RedisTokenStore {
    pub fn new(pool: Pool) -> Self {
        RedisTokenStore { pool }
    }

    pub async fn revoke(&self, prefix: &str, jti: &str, ttl_secs: u64) -> Result<(), AuthError> {
        let mut conn = self.pool
            .get()
            .await
            .map_err(|e| AuthError::RedisConnection(e.to_string()))?;

        conn.set_ex::<_, _, ()>(deny_key(prefix, jti), 1u8, ttl_secs.max(1))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }

    pub async fn is_revoked(&self, prefix: &str, jti: &str) -> Result<bool, AuthError> {
        let mut conn = self.pool
            .get()
            .await
            .map_err(|e| AuthError::RedisConnection(e.to_string()))?;

        conn.exists(deny_key(prefix, jti))
            .await
            .map_err(|e| AuthError::RedisOperation(e.to_string()))
    }

    pub async fn ping(&self) -> bool {
        match self.pool.get().await {
            Ok(mut conn) => {
                let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
                matches!(pong.as_deref(), Ok("PONG"))
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deny_keys_are_namespaced() {
        assert_eq!(deny_key(ACCESS_DENY_PREFIX, "abc"), "access_deny:abc");
        assert_eq!(deny_key(REFRESH_DENY_PREFIX, "abc"), "refresh_deny:abc");
    }
}
