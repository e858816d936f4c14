//! Concrete `Store`/`Lock` adapters.
//!
//! Non-normative: the core only depends on the traits in [`crate::store`].
//! These adapters exist so the crate has something runnable behind the
//! CLI and something fast behind the test suite.

pub mod fs_store;
pub mod mem_lock;
pub mod mem_store;
