//! Enumerates the direct subdirectory names under a prefix — used to
//! list binary package hashes under `<pkg>/<r>/package/`. See
//! SPEC_FULL §4.4.

use crate::error::Result;
use crate::pathutil::next_segment;
use crate::store::Store;

pub async fn list_packages(store: &dyn Store, prefix: &str) -> Result<Vec<String>> {
    let keys = store.list(prefix).await?;
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for key in keys {
        let seg = next_segment(prefix, &key);
        if seg.is_empty() {
            continue;
        }
        if seen.insert(seg.to_string()) {
            out.push(seg.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mem_store::InMemoryStore;

    #[tokio::test]
    async fn lists_unique_hash_subdirectories() {
        let store = InMemoryStore::new();
        let prefix = "zlib/1.2.11/_/_/0/package";
        store.seed(format!("{prefix}/aaaa/0/conaninfo.txt"), b"x".to_vec());
        store.seed(format!("{prefix}/aaaa/0/conanmanifest.txt"), b"x".to_vec());
        store.seed(format!("{prefix}/bbbb/0/conaninfo.txt"), b"x".to_vec());

        let mut hashes = list_packages(&store, prefix).await.unwrap();
        hashes.sort();
        assert_eq!(hashes, vec!["aaaa", "bbbb"]);
    }

    #[tokio::test]
    async fn empty_prefix_yields_empty_list() {
        let store = InMemoryStore::new();
        assert!(list_packages(&store, "nope").await.unwrap().is_empty());
    }
}
