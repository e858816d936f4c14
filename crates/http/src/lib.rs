//! Conan v1 read-endpoint HTTP layer over the revisions index core.

pub mod handlers;
pub mod ini;
pub mod md5fmt;

pub use handlers::HttpState;
