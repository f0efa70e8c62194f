use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    constants::{curriculum::default_questions, QUESTIONS_KEY},
    db::{Database, KeyValueStore},
    errors::AppResult,
    models::domain::Question,
};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// All questions, newest first. Seeds the default bank on first access.
    async fn list(&self) -> AppResult<Vec<Question>>;
    async fn add(&self, question: Question) -> AppResult<Question>;
    /// Returns whether a question with `id` existed.
    async fn remove(&self, id: &str) -> AppResult<bool>;
    async fn clear(&self) -> AppResult<()>;
}

pub struct KvQuestionRepository {
    store: Arc<dyn KeyValueStore>,
    write_lock: Mutex<()>,
}

impl KvQuestionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            store: db.store(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load_or_seed(&self) -> AppResult<Vec<Question>> {
        match self.store.get(QUESTIONS_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => {
                let seeded = default_questions();
                self.save(&seeded).await?;
                log::info!("Seeded question bank with {} default questions", seeded.len());
                Ok(seeded)
            }
        }
    }

    async fn save(&self, questions: &[Question]) -> AppResult<()> {
        let raw = serde_json::to_string(questions)?;
        self.store.set(QUESTIONS_KEY, raw).await
    }
}

#[async_trait]
impl QuestionRepository for KvQuestionRepository {
    async fn list(&self) -> AppResult<Vec<Question>> {
        let _guard = self.write_lock.lock().await;
        self.load_or_seed().await
    }

    async fn add(&self, question: Question) -> AppResult<Question> {
        let _guard = self.write_lock.lock().await;
        let mut questions = self.load_or_seed().await?;
        questions.insert(0, question.clone());
        self.save(&questions).await?;
        Ok(question)
    }

    async fn remove(&self, id: &str) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut questions = self.load_or_seed().await?;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        if questions.len() == before {
            return Ok(false);
        }
        self.save(&questions).await?;
        Ok(true)
    }

    async fn clear(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.store.remove(QUESTIONS_KEY).await
    }
}
