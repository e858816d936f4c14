//! JSON shape of a revisions index file, and the fixed file manifests
//! that define when a revision is "complete" in the backing store.

use serde::{Deserialize, Serialize};

/// One entry in a `revisions.txt` file.
///
/// `revision` is kept as a string on the wire — Conan clients expect
/// it that way — even though every consumer treats it as an integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    pub revision: String,
    #[serde(default)]
    pub timestamp: String,
}

impl RevisionEntry {
    pub fn new(revision: i64, timestamp: impl Into<String>) -> Self {
        Self { revision: revision.to_string(), timestamp: timestamp.into() }
    }

    /// Parses `revision` as an integer. Per spec §8 a non-integer value
    /// stored in an existing index is a `BadInput` condition for the
    /// caller, not a panic here.
    pub fn revision_int(&self) -> Option<i64> {
        self.revision.parse().ok()
    }
}

/// The on-disk shape of `revisions.txt`: `{ "revisions": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevisionsIndex {
    pub revisions: Vec<RevisionEntry>,
}

/// Files required for a recipe revision to be considered complete.
pub const RECIPE_MANIFEST: &[&str] =
    &["conanmanifest.txt", "conan_export.tgz", "conanfile.py", "conan_sources.tgz"];

/// Files required for a binary package revision to be considered complete.
pub const BINARY_MANIFEST: &[&str] = &["conanmanifest.txt", "conaninfo.txt", "conan_package.tgz"];

/// Name of the index file persisted under every indexed path.
pub const REVISIONS_FILE: &str = "revisions.txt";

/// A `name/version/user/channel` package coordinate. Opaque to the core;
/// used only as a storage-key prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageCoordinate(String);

impl PackageCoordinate {
    pub fn new(coord: impl Into<String>) -> Self {
        Self(coord.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PackageCoordinate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PackageCoordinate {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
