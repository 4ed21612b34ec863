//! File-backed storage implementation.
//!
//! Persists each key as one JSON file under a directory, standing in for
//! the browser persistent key-value API the original playback client used.
//! Keys are sanitized to file-system-safe names.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::ports::StoragePort;

const FILE_EXTENSION: &str = "json";

/// One-file-per-key persistent storage.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create the adapter, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::storage(format!("create {}: {}", root.display(), e)))?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.{}", safe, FILE_EXTENSION))
    }

    fn key_for(path: &Path) -> Option<String> {
        let name = path.file_stem()?.to_str()?;
        Some(name.to_string())
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::storage(format!(
                "read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key);
        tokio::fs::write(&path, value)
            .await
            .map_err(|e| StoreError::storage(format!("write {}: {}", path.display(), e)))
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::storage(format!(
                "remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| StoreError::storage(format!("list {}: {}", self.root.display(), e)))?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| StoreError::storage(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION) {
                if let Some(key) = Self::key_for(&path) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn size(&self) -> Result<usize, StoreError> {
        Ok(self.keys().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_adapter_restart() {
        let dir = tempfile::tempdir().expect("tempdir");

        {
            let storage = FileStorage::new(dir.path()).await.expect("create");
            storage
                .set("instance_abc", "{\"title\":\"t\"}".to_string())
                .await
                .expect("set");
        }

        let storage = FileStorage::new(dir.path()).await.expect("reopen");
        assert_eq!(
            storage.get("instance_abc").await.expect("get"),
            Some("{\"title\":\"t\"}".to_string())
        );
        assert_eq!(storage.keys().await.expect("keys"), vec!["instance_abc"]);
    }

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).await.expect("create");
        assert_eq!(storage.get("nope").await.expect("get"), None);
        storage.remove("nope").await.expect("remove is idempotent");
    }

    #[tokio::test]
    async fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = FileStorage::new(dir.path()).await.expect("create");
        storage
            .set("weird/key:name", "1".to_string())
            .await
            .expect("set");
        assert_eq!(
            storage.get("weird/key:name").await.expect("get"),
            Some("1".to_string())
        );
    }
}
