use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::errors::StorageError;

/// Sliding-window counter keyed by client IP. Timestamps are unix seconds.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Returns `true` and records the hit when `ip` is under the limit at `now`.
    /// Rejected hits are not recorded.
    async fn check_and_record(&self, ip: &str, now: i64) -> Result<bool, StorageError>;

    /// Drops hits older than the window and returns how many were removed.
    async fn prune(&self, now: i64) -> Result<usize, StorageError>;

    /// Number of hits currently held, across all clients.
    async fn tracked_hits(&self) -> Result<usize, StorageError>;
}
