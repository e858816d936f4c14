//! Atomic read-modify-write of a single revisions index file under its
//! own lock. See SPEC_FULL §4.1.

use chrono::Utc;

use crate::error::{IndexError, Result};
use crate::model::{RevisionEntry, RevisionsIndex, REVISIONS_FILE};
use crate::store::{with_lock, Lock, Store};

/// Joins a directory-ish path with `revisions.txt`, the way every path
/// template in the storage layout does.
pub fn index_path(dir: &str) -> String {
    format!("{dir}/{REVISIONS_FILE}")
}

/// Loads and parses the revisions array at `path`. A missing object is
/// equivalent to an empty array (spec I3); a present-but-unparseable
/// object is `CorruptIndex`.
pub async fn load(store: &dyn Store, path: &str) -> Result<Vec<RevisionEntry>> {
    if !store.exists(path).await? {
        return Ok(Vec::new());
    }
    let bytes = store.value(path).await?;
    let parsed: RevisionsIndex = serde_json::from_slice(&bytes)
        .map_err(|e| IndexError::corrupt(path.to_string(), e))?;
    Ok(parsed.revisions)
}

/// Persists a freshly-built revisions array (used by the indexer, which
/// does not go through [`add`]/[`remove`] since a rebuild replaces the
/// whole array at once and is already serialized by the outer lock).
pub(crate) async fn persist(store: &dyn Store, path: &str, revisions: Vec<RevisionEntry>) -> Result<()> {
    let index = RevisionsIndex { revisions };
    let bytes = serde_json::to_vec(&index)
        .map_err(|e| IndexError::corrupt(path.to_string(), e))?;
    store.save(path, bytes).await
}

/// Adds (or re-adds) `revision` at `path`, under `Lock(path)`.
///
/// Any existing entry for `revision` is removed first, then a fresh
/// entry with the current UTC timestamp is appended — uniqueness (I1)
/// holds and the timestamp refreshes on re-add.
pub async fn add(store: &dyn Store, lock: &dyn Lock, revision: i64, path: &str) -> Result<()> {
    with_lock(lock, path, || async {
        let mut revisions = load(store, path).await?;
        let rev_str = revision.to_string();
        revisions.retain(|e| e.revision != rev_str);
        revisions.push(RevisionEntry::new(revision, Utc::now().to_rfc3339()));
        persist(store, path, revisions).await
    })
    .await
}

/// Removes `revision` at `path`, under `Lock(path)`. Returns whether it
/// was present. A missing file is treated as "not present" without
/// writing anything.
pub async fn remove(store: &dyn Store, lock: &dyn Lock, revision: i64, path: &str) -> Result<bool> {
    with_lock(lock, path, || async {
        if !store.exists(path).await? {
            return Ok(false);
        }
        let mut revisions = load(store, path).await?;
        let rev_str = revision.to_string();
        let before = revisions.len();
        revisions.retain(|e| e.revision != rev_str);
        if revisions.len() == before {
            return Ok(false);
        }
        persist(store, path, revisions).await?;
        Ok(true)
    })
    .await
}

/// Maximum `revision` at `path` interpreted as an integer; `-1` if
/// empty or absent. Readers do not lock (spec §4.6).
pub async fn last(store: &dyn Store, path: &str) -> Result<i64> {
    let revisions = load(store, path).await?;
    let mut max = -1i64;
    for entry in &revisions {
        let v = entry
            .revision_int()
            .ok_or_else(|| IndexError::bad_input(path.to_string(), entry.revision.clone()))?;
        if v > max {
            max = v;
        }
    }
    Ok(max)
}

/// `revision` values at `path` as integers, preserving array order.
/// Readers do not lock.
pub async fn list(store: &dyn Store, path: &str) -> Result<Vec<i64>> {
    let revisions = load(store, path).await?;
    revisions
        .iter()
        .map(|e| {
            e.revision_int()
                .ok_or_else(|| IndexError::bad_input(path.to_string(), e.revision.clone()))
        })
        .collect()
}
