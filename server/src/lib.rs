//! Conan revisions server — facade over the index core and HTTP crates.
//!
//! Re-exports both so the binary crate keeps a single, stable import
//! surface, the way `codescope-server` re-exports `codescope-core` and
//! `codescope-http` under their original module names.

pub mod config;
pub mod router;

pub use conan_index_core as core;
pub use conan_index_http as http;
