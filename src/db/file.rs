use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;

use super::KeyValueStore;
use crate::errors::{AppError, AppResult};

/// Keeps each key in its own `<key>.json` file under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::StorageError(format!("Invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn open(&self) -> AppResult<()> {
        fs::create_dir_all(&self.dir).await?;
        log::info!("File store ready at {}", self.dir.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn close(&self) -> AppResult<()> {
        log::info!("File store at {} closed", self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("mathmaster-file-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = scratch_dir();

        let store = FileStore::new(&dir);
        store.open().await.unwrap();
        store
            .set("mathmaster_attempts", "[1,2]".to_string())
            .await
            .unwrap();
        store.close().await.unwrap();

        let reopened = FileStore::new(&dir);
        reopened.open().await.unwrap();
        assert_eq!(
            reopened.get("mathmaster_attempts").await.unwrap().as_deref(),
            Some("[1,2]")
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_key_reads_as_none_and_removes_cleanly() {
        let dir = scratch_dir();
        let store = FileStore::new(&dir);
        store.open().await.unwrap();

        assert_eq!(store.get("absent").await.unwrap(), None);
        assert!(store.remove("absent").await.is_ok());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rejects_path_like_keys() {
        let store = FileStore::new(scratch_dir());

        let err = store.get("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, AppError::StorageError(_)));
    }
}
