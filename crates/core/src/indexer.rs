//! Rebuilds a single revisions index by scanning the store and keeping
//! only revisions whose manifest is fully present. See SPEC_FULL §4.2.

use futures::future::try_join_all;

use crate::error::Result;
use crate::index::index_path;
use crate::model::RevisionEntry;
use crate::pathutil::revision_of;
use crate::store::Store;

/// Builds the pathname of manifest file `name` for revision `rev`,
/// rooted at `path`. Callers supply this so the same rebuild algorithm
/// serves both recipes (`<path>/<r>/export/<name>`) and binaries
/// (`<path>/<r>/<name>`).
pub type PathOf<'a> = dyn Fn(&str, i64) -> String + Send + Sync + 'a;

/// Rebuilds the revisions index rooted at `path`: lists everything
/// under `path`, derives candidate revisions from the first path
/// segment, retains only those with every `manifest` file present, and
/// persists the sorted-deduplicated result to `<path>/revisions.txt`
/// with empty timestamps (spec I4).
pub async fn build(
    store: &dyn Store,
    path: &str,
    manifest: &[&str],
    path_of: &PathOf<'_>,
) -> Result<Vec<i64>> {
    let keys = store.list(path).await?;

    let mut candidates: Vec<i64> = keys.iter().map(|k| revision_of(path, k)).filter(|&r| r >= 0).collect();
    candidates.sort_unstable();
    candidates.dedup();

    // All `exists` probes, within and across revisions, run concurrently;
    // the result waits on their conjunction (spec §4.2 step 3).
    let checks = candidates.iter().map(|&rev| async move {
        let probes = manifest.iter().map(|file| store.exists(&path_of(file, rev)));
        let results = try_join_all(probes).await?;
        Result::Ok(results.into_iter().all(|present| present))
    });
    let complete = try_join_all(checks).await?;

    let retained: Vec<i64> =
        candidates.into_iter().zip(complete).filter_map(|(rev, ok)| ok.then_some(rev)).collect();

    let entries = retained.iter().map(|&r| RevisionEntry::new(r, String::new())).collect();
    crate::index::persist(store, &index_path(path), entries).await?;

    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mem_store::InMemoryStore;
    use crate::model::{BINARY_MANIFEST, RECIPE_MANIFEST};

    fn recipe_path_of(path: &str) -> Box<PathOf<'static>> {
        let path = path.to_string();
        Box::new(move |name: &str, rev: i64| format!("{path}/{rev}/export/{name}"))
    }

    #[tokio::test]
    async fn rebuild_recipe_index_keeps_complete_revisions_only() {
        let store = InMemoryStore::new();
        let pkg = "zlib/1.2.11/_/_";
        for file in RECIPE_MANIFEST {
            store.seed(format!("{pkg}/0/export/{file}"), b"x".to_vec());
        }
        // Revision 1 is missing conanfile.py — incomplete.
        for file in RECIPE_MANIFEST.iter().filter(|f| **f != "conanfile.py") {
            store.seed(format!("{pkg}/1/export/{file}"), b"x".to_vec());
        }

        let path_of = recipe_path_of(pkg);
        let result = build(&store, pkg, RECIPE_MANIFEST, &*path_of).await.unwrap();
        assert_eq!(result, vec![0]);

        let written = store.value(&index_path(pkg)).await.unwrap();
        let parsed: crate::model::RevisionsIndex = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed.revisions.len(), 1);
        assert_eq!(parsed.revisions[0].revision, "0");
        assert_eq!(parsed.revisions[0].timestamp, "");
    }

    #[tokio::test]
    async fn rebuild_binary_index() {
        let store = InMemoryStore::new();
        let base = "zlib/1.2.11/_/_/0/package/6af9cc7cb931c5ad942174fd7838eb655717c709";
        for file in BINARY_MANIFEST {
            store.seed(format!("{base}/0/{file}"), b"x".to_vec());
        }

        let path_of: Box<PathOf<'static>> = {
            let base = base.to_string();
            Box::new(move |name: &str, rev: i64| format!("{base}/{rev}/{name}"))
        };
        let result = build(&store, base, BINARY_MANIFEST, &*path_of).await.unwrap();
        assert_eq!(result, vec![0]);
        assert!(store.exists(&index_path(base)).await.unwrap());
    }

    #[tokio::test]
    async fn rebuild_with_no_candidates_yields_empty() {
        let store = InMemoryStore::new();
        let path_of = recipe_path_of("pkg");
        let result = build(&store, "pkg", RECIPE_MANIFEST, &*path_of).await.unwrap();
        assert!(result.is_empty());
    }
}
