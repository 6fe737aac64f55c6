use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::future::Future;
use tokio::time::{timeout, Duration};

/// Upper bound for any single Redis command. Callers on the request path
/// must never block on the store longer than this.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis connection pool backed by a multiplexed connection manager.
///
/// `ConnectionManager` reconnects automatically and is cheap to clone, so the
/// pool hands out clones instead of guarding a single connection.
pub struct RedisPool {
    manager: ConnectionManager,
}

impl RedisPool {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("failed to construct Redis client")?;
        let manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;
        Ok(Self { manager })
    }

    pub fn manager(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

/// Execute a Redis command future with the shared command timeout.
///
/// A timeout is surfaced as an IO-kind `RedisError` so callers handle slow
/// and unreachable stores through the same error path.
pub async fn with_timeout<F, T>(fut: F) -> Result<T, RedisError>
where
    F: Future<Output = Result<T, RedisError>>,
{
    match timeout(COMMAND_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(RedisError::from((
            redis::ErrorKind::IoError,
            "redis command timed out",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_timeout_passes_through_success() {
        let result: Result<u32, RedisError> = with_timeout(async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn with_timeout_converts_hang_to_error() {
        let result: Result<(), RedisError> = with_timeout(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), redis::ErrorKind::IoError);
    }
}
