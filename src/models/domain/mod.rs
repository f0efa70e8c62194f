pub mod question;
pub mod quiz_attempt;
pub mod quiz_session;
pub use question::{Difficulty, GradeLevel, Question, TopicFilter};
pub use quiz_attempt::{QuizAttempt, StudentAnswer};
pub use quiz_session::{QuizSession, SessionStatus};
