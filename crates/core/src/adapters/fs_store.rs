//! Filesystem-backed `Store` adapter: keys map one-to-one onto paths
//! relative to a root directory, with `/` as the separator on every
//! platform (not `std::path::MAIN_SEPARATOR`).

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::Store;

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path
    }

    fn to_key(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn walk<'a>(
        &'a self,
        dir: PathBuf,
        out: &'a mut Vec<String>,
    ) -> futures::future::BoxFuture<'a, Result<()>> {
        Box::pin(async move {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(e) => e,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(crate::error::IndexError::store_io(self.to_key(&dir), e)),
        };
        while let Some(entry) =
            entries.next_entry().await.map_err(|e| crate::error::IndexError::store_io(self.to_key(&dir), e))?
        {
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| crate::error::IndexError::store_io(self.to_key(&path), e))?;
            if file_type.is_dir() {
                self.walk(path, out).await?;
            } else {
                out.push(self.to_key(&path));
            }
        }
        Ok(())
        })
    }
}

#[async_trait]
impl Store for FsStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let base = self.resolve(prefix);
        let mut out = Vec::new();
        if base.is_file() {
            out.push(prefix.to_string());
            return Ok(out);
        }
        self.walk(base, &mut out).await?;
        Ok(out)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(tokio::fs::metadata(self.resolve(key)).await.is_ok())
    }

    async fn value(&self, key: &str) -> Result<Vec<u8>> {
        tokio::fs::read(self.resolve(key)).await.map_err(|e| crate::error::IndexError::store_io(key, e))
    }

    async fn save(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.resolve(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| crate::error::IndexError::store_io(key, e))?;
        }
        tokio::fs::write(&path, value).await.map_err(|e| crate::error::IndexError::store_io(key, e))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.resolve(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(crate::error::IndexError::store_io(key, e)),
        }
    }
}
