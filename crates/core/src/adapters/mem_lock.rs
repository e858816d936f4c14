//! In-process `Lock` adapter: one `tokio::sync::Mutex` per key, held in
//! a side table so `release` can be called independently of drop.
//!
//! Lease expiration is not enforced here — this adapter is meant for a
//! single process (tests, the `index` CLI subcommand) where a held
//! lease cannot outlive the process anyway. A distributed backend
//! (out of scope, per spec §1) would need to track `expiresAt` and let
//! a stale lease lapse.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::Result;
use crate::store::Lock;

#[derive(Default)]
pub struct InMemoryLock {
    mutexes: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    held: Mutex<HashMap<String, OwnedMutexGuard<()>>>,
}

impl InMemoryLock {
    pub fn new() -> Self {
        Self::default()
    }

    async fn mutex_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut mutexes = self.mutexes.lock().await;
        mutexes.entry(key.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
    }
}

#[async_trait]
impl Lock for InMemoryLock {
    async fn acquire(&self, key: &str, _lease: Duration) -> Result<()> {
        let mutex = self.mutex_for(key).await;
        let guard = mutex.lock_owned().await;
        self.held.lock().await.insert(key.to_string(), guard);
        Ok(())
    }

    async fn release(&self, key: &str) -> Result<()> {
        // Dropping the guard releases the underlying tokio Mutex.
        self.held.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn release_is_idempotent() {
        let lock = InMemoryLock::new();
        lock.acquire("pkg", Duration::from_secs(1)).await.unwrap();
        lock.release("pkg").await.unwrap();
        lock.release("pkg").await.unwrap();
    }

    #[tokio::test]
    async fn reacquire_after_release_succeeds() {
        let lock = InMemoryLock::new();
        lock.acquire("pkg", Duration::from_secs(1)).await.unwrap();
        lock.release("pkg").await.unwrap();
        lock.acquire("pkg", Duration::from_secs(1)).await.unwrap();
    }
}
