pub mod generation_service;
pub mod question_service;
pub mod quiz_attempt_service;
pub mod quiz_session_service;
pub mod scoring;
