pub mod curriculum;
pub mod question_prompt;

/// Store key of the question bank collection.
pub const QUESTIONS_KEY: &str = "mathmaster_questions";
/// Store key of the quiz attempt log.
pub const ATTEMPTS_KEY: &str = "mathmaster_attempts";
