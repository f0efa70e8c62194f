#[cfg(test)]
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::models::domain::{
        Difficulty, GradeLevel, Question, QuizAttempt, StudentAnswer,
    };

    /// A 6ano question whose correct answer is option 1.
    pub fn sample_question(id: &str) -> Question {
        Question::with_id(
            id,
            "Quanto é 2 + 2?",
            ["3", "4", "5", "6"].map(String::from),
            1,
            "Operações com Naturais",
            Difficulty::Easy,
            GradeLevel::Sixth,
        )
        .expect("fixture question is valid")
    }

    pub fn sample_question_in(id: &str, grade: GradeLevel, category: &str) -> Question {
        let mut question = sample_question(id);
        question.grade_level = grade;
        question.category = category.to_string();
        question
    }

    /// Answers where the first `score` of `total` are correct.
    pub fn answers(score: u32, total: u32) -> Vec<StudentAnswer> {
        (0..total)
            .map(|i| StudentAnswer {
                question_id: format!("q-{}", i),
                selected_option_index: 0,
                is_correct: i < score,
                time_spent_seconds: 0.0,
            })
            .collect()
    }

    pub fn attempt_with_score(name: &str, score: u32, total: u32) -> QuizAttempt {
        QuizAttempt::from_answers(name, GradeLevel::Sixth, answers(score, total))
    }

    pub fn attempt_at(name: &str, score: u32, total: u32, timestamp: DateTime<Utc>) -> QuizAttempt {
        QuizAttempt::from_answers_at(name, GradeLevel::Sixth, answers(score, total), timestamp)
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_sample_question() {
        let q = sample_question("q-1");
        assert_eq!(q.id, "q-1");
        assert_eq!(q.correct_option_index, 1);
    }

    #[test]
    fn test_fixtures_attempt_with_score() {
        let attempt = attempt_with_score("Ana", 2, 3);
        assert_eq!(attempt.score, 2);
        assert_eq!(attempt.total_questions, 3);
        assert_eq!(attempt.answers.iter().filter(|a| a.is_correct).count(), 2);
    }
}
