use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::question::GradeLevel;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAnswer {
    pub question_id: String,
    pub selected_option_index: usize,
    pub is_correct: bool,
    pub time_spent_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    pub id: String,
    pub student_name: String,
    pub grade_level: GradeLevel,
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<StudentAnswer>,
}

impl QuizAttempt {
    /// Score and question count are always derived from the answers.
    pub fn from_answers(
        student_name: &str,
        grade_level: GradeLevel,
        answers: Vec<StudentAnswer>,
    ) -> Self {
        Self::from_answers_at(student_name, grade_level, answers, Utc::now())
    }

    pub fn from_answers_at(
        student_name: &str,
        grade_level: GradeLevel,
        answers: Vec<StudentAnswer>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count() as u32;
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            student_name: student_name.to_string(),
            grade_level,
            timestamp,
            score,
            total_questions: answers.len() as u32,
            answers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: &str, is_correct: bool) -> StudentAnswer {
        StudentAnswer {
            question_id: id.to_string(),
            selected_option_index: 0,
            is_correct,
            time_spent_seconds: 0.0,
        }
    }

    #[test]
    fn score_counts_correct_answers() {
        let attempt = QuizAttempt::from_answers(
            "Ana",
            GradeLevel::Sixth,
            vec![answer("a", true), answer("b", false), answer("c", true)],
        );

        assert_eq!(attempt.score, 2);
        assert_eq!(attempt.total_questions, 3);
        assert!(attempt.score <= attempt.total_questions);
    }

    #[test]
    fn quiz_attempt_round_trip_serialization_preserves_grading_fields() {
        let attempt =
            QuizAttempt::from_answers("Ana", GradeLevel::Seventh, vec![answer("q-1", true)]);

        let json = serde_json::to_string(&attempt).expect("attempt should serialize");
        assert!(json.contains("\"studentName\":\"Ana\""));
        assert!(json.contains("\"totalQuestions\":1"));

        let parsed: QuizAttempt = serde_json::from_str(&json).expect("attempt should deserialize");
        assert_eq!(parsed, attempt);
    }
}
