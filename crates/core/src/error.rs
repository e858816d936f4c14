//! Error kinds for the revisions index core.
//!
//! Mirrors the error taxonomy of the distilled specification directly:
//! store failures, lock contention, a corrupt index file, and malformed
//! revision input are all fatal to the operation in progress and are
//! never silently swallowed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("store I/O failed for key {key}: {source}")]
    StoreIo {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("lock unavailable for key {key}")]
    LockUnavailable { key: String },

    #[error("corrupt revisions index at {path}: {source}")]
    CorruptIndex {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad revision input at {path}: {detail}")]
    BadInput { path: String, detail: String },
}

impl IndexError {
    pub fn store_io(key: impl Into<String>, source: std::io::Error) -> Self {
        IndexError::StoreIo { key: key.into(), source }
    }

    pub fn corrupt(path: impl Into<String>, source: serde_json::Error) -> Self {
        IndexError::CorruptIndex { path: path.into(), source }
    }

    pub fn bad_input(path: impl Into<String>, detail: impl Into<String>) -> Self {
        IndexError::BadInput { path: path.into(), detail: detail.into() }
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
