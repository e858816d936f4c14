//! External collaborator interfaces: the object store and the
//! distributed lock. Both are specified only as traits — the core
//! never assumes a concrete backend. See `adapters` for the
//! filesystem/in-memory implementations this crate ships for the CLI
//! and for tests.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Flat key-value object store addressed by `/`-separated string keys.
#[async_trait]
pub trait Store: Send + Sync {
    /// All keys whose string form begins with `prefix + "/"` or equals
    /// `prefix`. Order is unspecified.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Fails if `key` is absent.
    async fn value(&self, key: &str) -> Result<Vec<u8>>;

    /// Creates or atomically replaces the value at `key`.
    async fn save(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Idempotent: deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Mutually-exclusive lease on a storage key with automatic expiration.
///
/// `acquire` waits until a lease is granted or a previously-held lease
/// elsewhere lapses. `release` is idempotent.
#[async_trait]
pub trait Lock: Send + Sync {
    async fn acquire(&self, key: &str, lease: Duration) -> Result<()>;

    /// Idempotent.
    async fn release(&self, key: &str) -> Result<()>;
}

/// Default lease duration for index-file locks (one hour, per spec §3/§6).
pub const DEFAULT_LEASE: Duration = Duration::from_secs(3600);

/// Runs `op` under `Lock(key)`, releasing the lease whether `op`
/// succeeds or fails (resolves the open question in SPEC_FULL §9:
/// release is scope-guarded rather than left to the 1h lease expiry).
pub async fn with_lock<F, Fut, T>(lock: &dyn Lock, key: &str, op: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    lock.acquire(key, DEFAULT_LEASE).await?;
    let result = op().await;
    // Release regardless of outcome; a release failure does not mask
    // the original error/result from `op`.
    if let Err(release_err) = lock.release(key).await {
        if result.is_ok() {
            return Err(release_err);
        }
        tracing::warn!(key, error = %release_err, "lock release failed after operation error");
    }
    result
}
