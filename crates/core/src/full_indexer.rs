//! Orchestrates a full index rebuild for a package coordinate: recipe
//! index, then every binary index under every resulting recipe
//! revision, with bounded concurrency. See SPEC_FULL §4.5.

use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::error::Result;
use crate::indexer::{self, PathOf};
use crate::model::{BINARY_MANIFEST, RECIPE_MANIFEST};
use crate::packages::list_packages;
use crate::store::{with_lock, Lock, Store};

/// Default bound on concurrent binary-index rebuilds within one
/// `full_update` call. Overridable by configuration (SPEC_FULL §10.3).
pub const DEFAULT_CONCURRENCY: usize = 16;

fn recipe_path_of(pkg: &str) -> Box<PathOf<'static>> {
    let pkg = pkg.to_string();
    Box::new(move |name: &str, rev: i64| format!("{pkg}/{rev}/export/{name}"))
}

fn binary_path_of(pkg: &str, recipe_rev: i64, hash: &str) -> Box<PathOf<'static>> {
    let base = format!("{pkg}/{recipe_rev}/package/{hash}");
    Box::new(move |name: &str, rev: i64| format!("{base}/{rev}/{name}"))
}

/// One binary index successfully rebuilt as part of a full update.
#[derive(Debug, Clone)]
pub struct BinaryRebuild {
    pub recipe_revision: i64,
    pub hash: String,
    pub revisions: Vec<i64>,
}

/// Result of a full update: the recipe revisions found, and every
/// binary index rebuilt underneath them.
#[derive(Debug, Clone, Default)]
pub struct FullUpdateResult {
    pub recipe_revisions: Vec<i64>,
    pub binaries: Vec<BinaryRebuild>,
}

/// Rebuilds the recipe index at `pkg`, then every binary index found
/// under each resulting recipe revision, bounded to `concurrency`
/// concurrent binary rebuilds. The whole operation runs under a single
/// `Lock(pkg)` so two full updates of the same package never race.
pub async fn full_update(
    store: &dyn Store,
    lock: &dyn Lock,
    pkg: &str,
    concurrency: usize,
) -> Result<FullUpdateResult> {
    with_lock(lock, pkg, || async move {
        let recipe_path_of = recipe_path_of(pkg);
        let recipe_revisions = indexer::build(store, pkg, RECIPE_MANIFEST, &*recipe_path_of).await?;

        // Stage 2: list binary package hashes under every recipe revision,
        // in parallel.
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut listing_futs = FuturesUnordered::new();
        for &rev in &recipe_revisions {
            let semaphore = semaphore.clone();
            let prefix = format!("{pkg}/{rev}/package");
            listing_futs.push(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore not closed");
                let hashes = list_packages(store, &prefix).await?;
                Result::Ok((rev, hashes))
            });
        }
        let mut recipe_hashes: Vec<(i64, Vec<String>)> = Vec::new();
        while let Some(item) = listing_futs.next().await {
            recipe_hashes.push(item?);
        }

        // Stage 3: rebuild every (recipe revision, hash) binary index,
        // bounded and in parallel.
        let mut rebuild_futs = FuturesUnordered::new();
        for (rev, hashes) in recipe_hashes {
            for hash in hashes {
                let semaphore = semaphore.clone();
                let path_of = binary_path_of(pkg, rev, &hash);
                let binary_base = format!("{pkg}/{rev}/package/{hash}");
                let hash_owned = hash.clone();
                rebuild_futs.push(async move {
                    let _permit = semaphore.acquire_owned().await.expect("semaphore not closed");
                    let revisions = indexer::build(store, &binary_base, BINARY_MANIFEST, &*path_of).await?;
                    Result::Ok(BinaryRebuild { recipe_revision: rev, hash: hash_owned, revisions })
                });
            }
        }
        let mut binaries = Vec::new();
        while let Some(item) = rebuild_futs.next().await {
            binaries.push(item?);
        }

        Ok(FullUpdateResult { recipe_revisions, binaries })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mem_lock::InMemoryLock;
    use crate::adapters::mem_store::InMemoryStore;

    #[tokio::test]
    async fn full_update_rebuilds_recipe_and_binary_indexes() {
        let store = InMemoryStore::new();
        let lock = InMemoryLock::new();
        let pkg = "zlib/1.2.11/_/_";
        let hash = "6af9cc7cb931c5ad942174fd7838eb655717c709";

        for file in RECIPE_MANIFEST {
            store.seed(format!("{pkg}/0/export/{file}"), b"x".to_vec());
        }
        for file in BINARY_MANIFEST {
            store.seed(format!("{pkg}/0/package/{hash}/0/{file}"), b"x".to_vec());
        }

        let result = full_update(&store, &lock, pkg, DEFAULT_CONCURRENCY).await.unwrap();
        assert_eq!(result.recipe_revisions, vec![0]);
        assert_eq!(result.binaries.len(), 1);
        assert_eq!(result.binaries[0].hash, hash);
        assert_eq!(result.binaries[0].revisions, vec![0]);

        assert!(store.exists(&format!("{pkg}/revisions.txt")).await.unwrap());
        assert!(store
            .exists(&format!("{pkg}/0/package/{hash}/revisions.txt"))
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn full_update_with_no_recipe_revisions_is_empty() {
        let store = InMemoryStore::new();
        let lock = InMemoryLock::new();
        let result = full_update(&store, &lock, "nothing/here/_/_", DEFAULT_CONCURRENCY).await.unwrap();
        assert!(result.recipe_revisions.is_empty());
        assert!(result.binaries.is_empty());
    }
}
