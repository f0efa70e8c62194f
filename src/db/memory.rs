use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::errors::AppResult;

/// Volatile store for tests and throwaway runs.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn open(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_remove() {
        let store = MemoryStore::new();

        assert_eq!(store.get("questions").await.unwrap(), None);

        store.set("questions", "[]".to_string()).await.unwrap();
        assert_eq!(store.get("questions").await.unwrap().as_deref(), Some("[]"));

        store.remove("questions").await.unwrap();
        assert_eq!(store.get("questions").await.unwrap(), None);
    }

    #[tokio::test]
    async fn removing_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("nothing").await.is_ok());
    }
}
