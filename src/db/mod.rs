use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::{Config, StoreBackend},
    errors::AppResult,
};

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Whole-value string store keyed by collection name.
///
/// Callers read a full collection, change it and write it back; there are no
/// partial updates. `open` must be called before use and `close` when done.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn open(&self) -> AppResult<()>;
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> AppResult<()>;
    async fn remove(&self, key: &str) -> AppResult<()>;
    async fn close(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct Database {
    store: Arc<dyn KeyValueStore>,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let store: Arc<dyn KeyValueStore> = match config.store_backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(FileStore::new(&config.data_dir)),
        };

        let db = Self::from_store(store).await?;
        log::info!("Opened {:?} store", config.store_backend);
        Ok(db)
    }

    /// Opens an already constructed store.
    pub async fn from_store(store: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        store.open().await?;
        Ok(Self { store })
    }

    pub async fn in_memory() -> AppResult<Self> {
        Self::from_store(Arc::new(MemoryStore::new())).await
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.store.get("mathmaster_health").await?;
        Ok(())
    }

    pub async fn close(&self) -> AppResult<()> {
        self.store.close().await
    }
}
