use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::quiz_session::AnswerFeedback;
use crate::models::domain::{
    Difficulty, GradeLevel, Question, QuizAttempt, QuizSession, SessionStatus, TopicFilter,
};
use crate::services::scoring::percentage;

/// A question as shown to a student: the answer key is left out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            options: question.options.to_vec(),
            category: question.category.clone(),
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub attempt_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
}

impl From<&QuizAttempt> for SessionResult {
    fn from(attempt: &QuizAttempt) -> Self {
        SessionResult {
            attempt_id: attempt.id.clone(),
            score: attempt.score,
            total_questions: attempt.total_questions,
            percentage: percentage(attempt.score, attempt.total_questions),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub status: SessionStatus,
    pub student_name: Option<String>,
    pub grade_level: Option<GradeLevel>,
    pub topic: Option<TopicFilter>,
    pub seed: Option<u64>,
    pub total_questions: usize,
    /// 1-based position of the current question ("Questão N de M").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_number: Option<usize>,
    /// Fraction of questions already committed, 0.0 to 1.0.
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<AnswerFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SessionResult>,
}

impl From<&QuizSession> for SessionView {
    fn from(session: &QuizSession) -> Self {
        let setup = session.setup();
        let total = session.questions().len();
        let current = session.current_question();
        let progress = if total == 0 {
            0.0
        } else {
            session.answers().len() as f64 / total as f64
        };

        SessionView {
            session_id: session.id().to_string(),
            status: session.status(),
            student_name: setup.map(|s| s.student_name.clone()),
            grade_level: setup.map(|s| s.grade_level),
            topic: setup.map(|s| s.topic.clone()),
            seed: setup.map(|s| s.seed),
            total_questions: total,
            question_number: current.map(|_| session.current_index() + 1),
            progress,
            current_question: current.map(QuestionView::from),
            feedback: session.pending_feedback(),
            result: session.attempt().map(SessionResult::from),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerResponse {
    /// False when an earlier answer to this question was still pending.
    pub accepted: bool,
    pub feedback: AnswerFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub attempt_id: String,
    pub student_name: String,
    pub grade_level: GradeLevel,
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicsResponse {
    pub grade_level: GradeLevel,
    pub label: &'static str,
    pub topics: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
