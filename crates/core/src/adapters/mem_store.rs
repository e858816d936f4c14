//! In-memory `Store` adapter used by the unit/integration test suite.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io;
use std::sync::RwLock;

use crate::error::{IndexError, Result};
use crate::store::Store;

#[derive(Default)]
pub struct InMemoryStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test convenience: seed a key directly without going through `save`.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.objects.write().unwrap().insert(key.into(), value.into());
    }

    fn poisoned(key: &str) -> IndexError {
        IndexError::store_io(key, io::Error::new(io::ErrorKind::Other, "lock poisoned"))
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned(prefix))?;
        if prefix.is_empty() {
            return Ok(objects.keys().cloned().collect());
        }
        let with_slash = format!("{prefix}/");
        Ok(objects
            .keys()
            .filter(|k| k.as_str() == prefix || k.starts_with(&with_slash))
            .cloned()
            .collect())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let objects = self.objects.read().map_err(|_| Self::poisoned(key))?;
        Ok(objects.contains_key(key))
    }

    async fn value(&self, key: &str) -> Result<Vec<u8>> {
        let objects = self.objects.read().map_err(|_| Self::poisoned(key))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| IndexError::store_io(key, io::Error::new(io::ErrorKind::NotFound, "no such key")))
    }

    async fn save(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned(key))?;
        objects.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut objects = self.objects.write().map_err(|_| Self::poisoned(key))?;
        objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn list_matches_prefix_and_exact_key() {
        let store = InMemoryStore::new();
        store.seed("pkg/0/export/conanfile.py", b"x".to_vec());
        store.seed("pkg", b"y".to_vec());
        store.seed("other/0/export/conanfile.py", b"z".to_vec());

        let mut keys = store.list("pkg").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["pkg", "pkg/0/export/conanfile.py"]);
    }

    #[tokio::test]
    async fn value_on_missing_key_is_error() {
        let store = InMemoryStore::new();
        assert!(store.value("nope").await.is_err());
    }

    #[tokio::test]
    async fn list_empty_prefix_returns_every_key() {
        let store = InMemoryStore::new();
        store.seed("a/0/export/conanfile.py", b"x".to_vec());
        store.seed("b/0/export/conanfile.py", b"x".to_vec());

        let mut keys = store.list("").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a/0/export/conanfile.py", "b/0/export/conanfile.py"]);
    }
}
