//! File-backed gateway: one `<key>.json` file per key.
//!
//! Writes go to a sibling temp file first and are renamed into place so a
//! crash mid-write never leaves a truncated version behind.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{GatewayError, PersistenceGateway, StoredEntry};

const EXTENSION: &str = ".json";

/// Gateway storing each key as a JSON file under `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, GatewayError> {
        if key.is_empty() || key.contains(['/', '\\', '\0']) || key.contains("..") {
            return Err(GatewayError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}{EXTENSION}")))
    }
}

#[async_trait]
impl PersistenceGateway for FileStore {
    async fn get(&self, key: &str) -> Result<Option<StoredEntry>, GatewayError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(StoredEntry { key: key.to_owned(), value })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<StoredEntry, GatewayError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(key, bytes = value.len(), "file store write");
        Ok(StoredEntry { key: key.to_owned(), value: value.to_owned() })
    }

    async fn delete(&self, key: &str) -> Result<bool, GatewayError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, GatewayError> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut keys = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(key) = name.strip_suffix(EXTENSION) {
                if key.starts_with(prefix) {
                    keys.push(key.to_owned());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
