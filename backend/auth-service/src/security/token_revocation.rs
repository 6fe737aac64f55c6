/// Token revocation backed by a shared key-existence cache.
///
/// A logout inserts an entry whose TTL equals the token's remaining
/// validity, so the blacklist self-prunes and can never outgrow the set of
/// live sessions. Tokens are hashed before use as keys so raw credentials
/// never appear in Redis dumps.
use crate::error::{AuthError, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{info, warn};

const KEY_PREFIX: &str = "palisade:revoked:token:";

/// Storage seam for revocation state. The production implementation is
/// Redis-backed; tests substitute an in-memory map.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Mark a token revoked for `ttl`. Recording the same token again
    /// overwrites the entry rather than failing.
    async fn record(&self, token: &str, ttl: Duration) -> Result<()>;

    /// Whether the token is currently revoked.
    async fn is_revoked(&self, token: &str) -> Result<bool>;
}

pub struct RedisRevocationStore {
    redis: ConnectionManager,
    fail_open: bool,
}

impl RedisRevocationStore {
    /// `fail_open` selects the posture for an unreachable store during the
    /// existence check: report not-revoked and keep serving, or surface the
    /// outage and reject. Recording always surfaces the outage.
    pub fn new(redis: ConnectionManager, fail_open: bool) -> Self {
        Self { redis, fail_open }
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn record(&self, token: &str, ttl: Duration) -> Result<()> {
        let key = revocation_key(token);
        let ttl_secs = ttl.as_secs().max(1);

        let mut conn = self.redis.clone();
        redis_utils::with_timeout(async {
            redis::cmd("SET")
                .arg(&key)
                .arg("1")
                .arg("EX")
                .arg(ttl_secs)
                .query_async::<_, ()>(&mut conn)
                .await
        })
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        info!(
            "Token revoked, blacklist entry expires in {} seconds",
            ttl_secs
        );
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let key = revocation_key(token);

        let mut conn = self.redis.clone();
        let result = redis_utils::with_timeout(async {
            redis::cmd("EXISTS")
                .arg(&key)
                .query_async::<_, bool>(&mut conn)
                .await
        })
        .await;

        match result {
            Ok(exists) => Ok(exists),
            Err(err) if self.fail_open => {
                warn!(
                    "Revocation store unreachable, skipping blacklist check: {}",
                    err
                );
                Ok(false)
            }
            Err(err) => Err(AuthError::StoreUnavailable(err.to_string())),
        }
    }
}

fn revocation_key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, hash_token(token))
}

/// Hex-encoded SHA-256 of the raw token string.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        let token = "test_token_12345";
        let hash1 = hash_token(token);
        let hash2 = hash_token(token);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_uniqueness() {
        let hash1 = hash_token("token1");
        let hash2 = hash_token("token2");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_length() {
        // SHA-256 produces 64 hex characters
        assert_eq!(hash_token("any_token").len(), 64);
    }

    #[test]
    fn test_key_is_namespaced() {
        let key = revocation_key("some-token");
        assert!(key.starts_with(KEY_PREFIX));
    }
}
