//! Public façade over a single package coordinate: the typed surface
//! most callers (HTTP handlers, the CLI) should use instead of the
//! lower-level `index`/`indexer`/`packages` modules directly. See
//! SPEC_FULL §4.6.

use crate::error::Result;
use crate::full_indexer::{self, FullUpdateResult, DEFAULT_CONCURRENCY};
use crate::index;
use crate::indexer::{self, PathOf};
use crate::model::{PackageCoordinate, BINARY_MANIFEST, RECIPE_MANIFEST};
use crate::packages::list_packages;
use crate::store::{Lock, Store};

pub struct RevisionsApi<'a> {
    store: &'a dyn Store,
    lock: &'a dyn Lock,
    pkg: PackageCoordinate,
}

impl<'a> RevisionsApi<'a> {
    pub fn new(store: &'a dyn Store, lock: &'a dyn Lock, pkg: impl Into<PackageCoordinate>) -> Self {
        Self { store, lock, pkg: pkg.into() }
    }

    fn recipe_path_of(&self) -> Box<PathOf<'static>> {
        let pkg = self.pkg.as_str().to_string();
        Box::new(move |name: &str, rev: i64| format!("{pkg}/{rev}/export/{name}"))
    }

    fn binary_base(&self, recipe_rev: i64, hash: &str) -> String {
        format!("{}/{recipe_rev}/package/{hash}", self.pkg)
    }

    fn binary_path_of(&self, recipe_rev: i64, hash: &str) -> Box<PathOf<'static>> {
        let base = self.binary_base(recipe_rev, hash);
        Box::new(move |name: &str, rev: i64| format!("{base}/{rev}/{name}"))
    }

    /// Rebuilds the recipe index; held under `Lock(pkg)`.
    pub async fn update_recipe_index(&self) -> Result<Vec<i64>> {
        let pkg = self.pkg.as_str().to_string();
        let path_of = self.recipe_path_of();
        crate::store::with_lock(self.lock, self.pkg.as_str(), || async move {
            indexer::build(self.store, &pkg, RECIPE_MANIFEST, &*path_of).await
        })
        .await
    }

    /// Rebuilds the binary index for `(recipeRev, hash)`; held under
    /// `Lock(pkg/recipeRev/package/hash)`.
    pub async fn update_binary_index(&self, recipe_rev: i64, hash: &str) -> Result<Vec<i64>> {
        let base = self.binary_base(recipe_rev, hash);
        let path_of = self.binary_path_of(recipe_rev, hash);
        let base_for_build = base.clone();
        crate::store::with_lock(self.lock, &base, || async move {
            indexer::build(self.store, &base_for_build, BINARY_MANIFEST, &*path_of).await
        })
        .await
    }

    pub async fn add_recipe_revision(&self, revision: i64) -> Result<()> {
        let path = index::index_path(self.pkg.as_str());
        index::add(self.store, self.lock, revision, &path).await
    }

    pub async fn remove_recipe_revision(&self, revision: i64) -> Result<bool> {
        let path = index::index_path(self.pkg.as_str());
        index::remove(self.store, self.lock, revision, &path).await
    }

    pub async fn get_recipe_revisions(&self) -> Result<Vec<i64>> {
        let path = index::index_path(self.pkg.as_str());
        index::list(self.store, &path).await
    }

    pub async fn get_last_recipe_revision(&self) -> Result<i64> {
        let path = index::index_path(self.pkg.as_str());
        index::last(self.store, &path).await
    }

    pub async fn add_binary_revision(&self, recipe_rev: i64, hash: &str, revision: i64) -> Result<()> {
        let path = index::index_path(&self.binary_base(recipe_rev, hash));
        index::add(self.store, self.lock, revision, &path).await
    }

    pub async fn remove_binary_revision(&self, recipe_rev: i64, hash: &str, revision: i64) -> Result<bool> {
        let path = index::index_path(&self.binary_base(recipe_rev, hash));
        index::remove(self.store, self.lock, revision, &path).await
    }

    pub async fn get_binary_revisions(&self, recipe_rev: i64, hash: &str) -> Result<Vec<i64>> {
        let path = index::index_path(&self.binary_base(recipe_rev, hash));
        index::list(self.store, &path).await
    }

    pub async fn get_last_binary_revision(&self, recipe_rev: i64, hash: &str) -> Result<i64> {
        let path = index::index_path(&self.binary_base(recipe_rev, hash));
        index::last(self.store, &path).await
    }

    pub async fn get_package_list(&self, recipe_rev: i64) -> Result<Vec<String>> {
        let prefix = format!("{}/{recipe_rev}/package", self.pkg);
        list_packages(self.store, &prefix).await
    }

    /// Recipe rebuild, then every binary rebuild under it, bounded to
    /// `concurrency` concurrent binary rebuilds and held under a single
    /// `Lock(pkg)` for the whole duration.
    pub async fn full_index_update_with_concurrency(&self, concurrency: usize) -> Result<FullUpdateResult> {
        full_indexer::full_update(self.store, self.lock, self.pkg.as_str(), concurrency).await
    }

    /// [`Self::full_index_update_with_concurrency`] at the default bound.
    pub async fn full_index_update(&self) -> Result<FullUpdateResult> {
        self.full_index_update_with_concurrency(DEFAULT_CONCURRENCY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mem_lock::InMemoryLock;
    use crate::adapters::mem_store::InMemoryStore;

    #[tokio::test]
    async fn facade_add_list_remove_round_trip() {
        let store = InMemoryStore::new();
        let lock = InMemoryLock::new();
        let api = RevisionsApi::new(&store, &lock, "zlib/1.2.11/_/_");

        api.add_recipe_revision(0).await.unwrap();
        api.add_recipe_revision(1).await.unwrap();
        assert_eq!(api.get_recipe_revisions().await.unwrap(), vec![0, 1]);
        assert_eq!(api.get_last_recipe_revision().await.unwrap(), 1);

        assert!(api.remove_recipe_revision(0).await.unwrap());
        assert_eq!(api.get_recipe_revisions().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn facade_binary_revisions_are_scoped_per_hash() {
        let store = InMemoryStore::new();
        let lock = InMemoryLock::new();
        let api = RevisionsApi::new(&store, &lock, "zlib/1.2.11/_/_");

        api.add_binary_revision(0, "aaaa", 0).await.unwrap();
        api.add_binary_revision(0, "bbbb", 0).await.unwrap();

        assert_eq!(api.get_binary_revisions(0, "aaaa").await.unwrap(), vec![0]);
        let mut hashes = api.get_package_list(0).await.unwrap();
        hashes.sort();
        assert_eq!(hashes, vec!["aaaa", "bbbb"]);
    }

    #[tokio::test]
    async fn facade_update_recipe_index_rebuilds_from_store() {
        use crate::model::RECIPE_MANIFEST;
        let store = InMemoryStore::new();
        let lock = InMemoryLock::new();
        let pkg = "zlib/1.2.11/_/_";
        for file in RECIPE_MANIFEST {
            store.seed(format!("{pkg}/0/export/{file}"), b"x".to_vec());
        }
        let api = RevisionsApi::new(&store, &lock, pkg);
        assert_eq!(api.update_recipe_index().await.unwrap(), vec![0]);
    }
}
