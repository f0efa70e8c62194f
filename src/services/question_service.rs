use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{GradeLevel, Question, TopicFilter},
        dto::request::CreateQuestionRequest,
    },
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Newest first, optionally narrowed to a grade and topic.
    pub async fn list_questions(
        &self,
        grade: Option<GradeLevel>,
        topic: &TopicFilter,
    ) -> AppResult<Vec<Question>> {
        let questions = self.repository.list().await?;
        Ok(questions
            .into_iter()
            .filter(|q| grade.map_or(true, |g| q.grade_level == g) && topic.matches(&q.category))
            .collect())
    }

    pub async fn all_questions(&self) -> AppResult<Vec<Question>> {
        self.repository.list().await
    }

    /// Manual authoring path.
    pub async fn create_question(&self, request: CreateQuestionRequest) -> AppResult<Question> {
        request.validate()?;

        let options = request.option_array().ok_or_else(|| {
            AppError::ValidationError("exactly four options are required".to_string())
        })?;

        let question = Question::new(
            &request.text,
            options,
            request.correct_option_index,
            request.category.as_deref().unwrap_or_default(),
            request.difficulty.unwrap_or_default(),
            request.grade_level,
        )?;

        self.add_question(question).await
    }

    pub async fn add_question(&self, question: Question) -> AppResult<Question> {
        let saved = self.repository.add(question).await?;
        log::info!(
            "Added question {} ({}, {})",
            saved.id,
            saved.grade_level,
            saved.category
        );
        Ok(saved)
    }

    pub async fn delete_question(&self, id: &str) -> AppResult<()> {
        if !self.repository.remove(id).await? {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }
        log::info!("Deleted question {}", id);
        Ok(())
    }

    /// Drops the stored bank; the next read re-seeds the defaults.
    pub async fn reset(&self) -> AppResult<()> {
        self.repository.clear().await?;
        log::info!("Cleared question bank");
        Ok(())
    }
}
