use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::{
        domain::{GradeLevel, QuizAttempt},
        dto::response::LeaderboardEntry,
    },
    repositories::QuizAttemptRepository,
    services::scoring,
};

pub struct QuizAttemptService {
    repository: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(repository: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_attempts(&self) -> AppResult<Vec<QuizAttempt>> {
        self.repository.list().await
    }

    /// Ranked results, optionally restricted to one grade.
    pub async fn leaderboard(&self, grade: Option<GradeLevel>) -> AppResult<Vec<LeaderboardEntry>> {
        let attempts: Vec<QuizAttempt> = self
            .repository
            .list()
            .await?
            .into_iter()
            .filter(|a| grade.map_or(true, |g| a.grade_level == g))
            .collect();

        Ok(scoring::leaderboard(attempts))
    }

    pub async fn reset(&self) -> AppResult<()> {
        self.repository.clear().await?;
        log::info!("Cleared all quiz attempts");
        Ok(())
    }
}
