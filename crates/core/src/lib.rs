//! Revisions index core for a Conan package repository.
//!
//! Owns the JSON shape of a `revisions.txt` index file, the
//! lock-guarded mutation primitives over it, the store-scanning
//! indexer that rebuilds it, and the facade ([`api::RevisionsApi`])
//! that ties both together per package coordinate.

pub mod adapters;
pub mod api;
pub mod error;
pub mod full_indexer;
pub mod index;
pub mod indexer;
pub mod model;
pub mod packages;
pub mod pathutil;
pub mod store;

pub use api::RevisionsApi;
pub use error::{IndexError, Result};
pub use model::{PackageCoordinate, RevisionEntry, RevisionsIndex, BINARY_MANIFEST, RECIPE_MANIFEST};
pub use store::{Lock, Store};
