//! Repository configuration: bind address, store root, full-index
//! concurrency bound, and log filter. Loaded from an optional TOML
//! file with CLI flags taking precedence, the way the teacher loads
//! `.codescope.toml` and merges it with `Cli` fields in `main.rs`.
//! See SPEC_FULL §10.3.

use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_concurrency() -> usize {
    conan_index_core::full_indexer::DEFAULT_CONCURRENCY
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// On-disk shape of `conan-revisions.toml`. Every field is optional so
/// a config file can override only what it needs to; CLI flags take
/// precedence over whatever the file sets (see `merge_cli`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    pub store_root: Option<PathBuf>,
    #[serde(default = "default_concurrency")]
    pub full_index_concurrency: usize,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            store_root: None,
            full_index_concurrency: default_concurrency(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads a config file if present; a missing file yields defaults
    /// rather than an error (config is always optional).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else { return Ok(Self::default()) };
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&text).map_err(ConfigError::Parse)
    }

    pub fn with_bind(mut self, bind: Option<String>) -> Self {
        if let Some(bind) = bind {
            self.bind = bind;
        }
        self
    }

    pub fn with_store_root(mut self, root: Option<PathBuf>) -> Self {
        if root.is_some() {
            self.store_root = root;
        }
        self
    }

    pub fn store_root_or_cwd(&self) -> std::io::Result<PathBuf> {
        match &self.store_root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_yields_defaults() {
        let config = ServerConfig::load(Some(Path::new("/nonexistent/conan-revisions.toml"))).unwrap();
        assert_eq!(config.bind, "127.0.0.1:8080");
    }

    #[test]
    fn cli_bind_overrides_config_file() {
        let config = ServerConfig::default().with_bind(Some("0.0.0.0:9000".to_string()));
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn parses_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conan-revisions.toml");
        std::fs::write(&path, "bind = \"0.0.0.0:1234\"\n").unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind, "0.0.0.0:1234");
        assert_eq!(config.full_index_concurrency, conan_index_core::full_indexer::DEFAULT_CONCURRENCY);
    }
}
