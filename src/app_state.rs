use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{KvQuestionRepository, KvQuizAttemptRepository},
    services::{
        generation_service::{GenerationService, OpenAiQuestionGenerator, QuestionGenerator},
        question_service::QuestionService,
        quiz_attempt_service::QuizAttemptService,
        quiz_session_service::QuizSessionService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub question_service: Arc<QuestionService>,
    pub attempt_service: Arc<QuizAttemptService>,
    pub session_service: Arc<QuizSessionService>,
    pub generation_service: Arc<GenerationService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;
        let generator = Arc::new(OpenAiQuestionGenerator::new(&config));
        Ok(Self::with_parts(config, db, generator))
    }

    /// Wires services over an opened database and a chosen generator.
    pub fn with_parts(
        config: Config,
        db: Database,
        generator: Arc<dyn QuestionGenerator>,
    ) -> Self {
        let question_repository = Arc::new(KvQuestionRepository::new(&db));
        let attempt_repository = Arc::new(KvQuizAttemptRepository::new(&db));

        let question_service = Arc::new(QuestionService::new(question_repository.clone()));
        let attempt_service = Arc::new(QuizAttemptService::new(attempt_repository.clone()));
        let session_service = Arc::new(QuizSessionService::new(
            question_repository,
            attempt_repository,
            config.feedback_delay(),
        ));
        let generation_service = Arc::new(GenerationService::new(
            generator,
            question_service.clone(),
        ));

        Self {
            db,
            question_service,
            attempt_service,
            session_service,
            generation_service,
            config: Arc::new(config),
        }
    }

    /// Drops every session, then wipes both collections. Sessions go first so
    /// no feedback timer can append an attempt after the log is cleared. The
    /// question bank comes back as the default seed on the next read.
    pub async fn reset_all_data(&self) -> AppResult<()> {
        self.session_service.clear().await;
        self.question_service.reset().await?;
        self.attempt_service.reset().await?;
        log::warn!("All application data was reset");
        Ok(())
    }
}
