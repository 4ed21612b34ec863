//! In-memory storage implementation for development and testing
//!
//! This implementation uses a simple HashMap behind an async RwLock.
//! It does not persist data and is suitable for testing and development only.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::ports::StoragePort;

/// In-memory storage implementation
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn size(&self) -> Result<usize, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove_roundtrip() {
        let storage = MemoryStorage::new();
        storage
            .set("instance_a", "{}".to_string())
            .await
            .expect("set");
        assert_eq!(
            storage.get("instance_a").await.expect("get"),
            Some("{}".to_string())
        );
        assert_eq!(storage.size().await.expect("size"), 1);

        storage.remove("instance_a").await.expect("remove");
        assert_eq!(storage.get("instance_a").await.expect("get"), None);
        assert_eq!(storage.size().await.expect("size"), 0);
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let storage = MemoryStorage::new();
        storage.set("b", "2".to_string()).await.expect("set");
        storage.set("a", "1".to_string()).await.expect("set");
        assert_eq!(storage.keys().await.expect("keys"), vec!["a", "b"]);
    }
}
