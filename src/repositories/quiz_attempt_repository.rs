use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    constants::ATTEMPTS_KEY,
    db::{Database, KeyValueStore},
    errors::AppResult,
    models::domain::QuizAttempt,
};

/// Append-only attempt log. `clear` exists only for a full data reset.
#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<QuizAttempt>>;
    async fn append(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn clear(&self) -> AppResult<()>;
}

pub struct KvQuizAttemptRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl KvQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            store: db.store(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> AppResult<Vec<QuizAttempt>> {
        match self.store.get(ATTEMPTS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl QuizAttemptRepository for KvQuizAttemptRepository {
    async fn list(&self) -> AppResult<Vec<QuizAttempt>> {
        self.load().await
    }

    async fn append(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let _guard = self.write_lock.lock().await;
        let mut attempts = self.load().await?;
        attempts.insert(0, attempt.clone());
        let raw = serde_json::to_string(&attempts)?;
        self.store.set(ATTEMPTS_KEY, raw).await?;
        Ok(attempt)
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(ATTEMPTS_KEY).await
    }
}
