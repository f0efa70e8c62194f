pub mod question_repository;
pub mod quiz_attempt_repository;

pub use question_repository::{KvQuestionRepository, QuestionRepository};
pub use quiz_attempt_repository::{KvQuizAttemptRepository, QuizAttemptRepository};
