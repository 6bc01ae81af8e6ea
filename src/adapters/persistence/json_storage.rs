//! Implements StoragePort with one JSON file per key.
//!
//! `<dir>/<key>.json`. Writes go through a temp file and a rename so a crash mid-write
//! leaves the previous value intact.

use crate::domain::DomainError;
use crate::ports::StoragePort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// File-backed key-value storage rooted at a directory.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Keys become file names, so anything outside `[A-Za-z0-9_-]` is rejected.
    fn key_path(&self, key: &str) -> Result<PathBuf, DomainError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(DomainError::Storage(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait::async_trait]
impl StoragePort for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Storage(format!(
                "read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let path = self.key_path(key)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Storage(format!("create dir: {}", e)))?;

        let temp_path = path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Storage(format!("create temp file: {}", e)))?;
        f.write_all(value.as_bytes())
            .await
            .map_err(|e| DomainError::Storage(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Storage(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| DomainError::Storage(format!("atomic rename failed: {}", e)))?;
        debug!(path = %path.display(), bytes = value.len(), "storage key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Storage(format!(
                "remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
