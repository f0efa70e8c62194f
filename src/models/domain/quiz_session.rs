//! The state machine behind one student's quiz run.
//!
//! `NotStarted -> InProgress <-> AnsweredPending -> Finished`, or
//! `NotStarted -> Empty` when the filter matches nothing. Committing a pending
//! answer is a separate step so callers decide when the feedback pause ends.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

use super::question::{GradeLevel, Question, TopicFilter, OPTION_COUNT};
use super::quiz_attempt::{QuizAttempt, StudentAnswer};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    NotStarted,
    Empty,
    InProgress,
    AnsweredPending,
    Finished,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSetup {
    pub student_name: String,
    pub grade_level: GradeLevel,
    pub topic: TopicFilter,
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub question_id: String,
    pub selected_option_index: usize,
    pub is_correct: bool,
    pub correct_option_index: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Accepted(AnswerFeedback),
    /// An answer is already waiting to be committed; nothing changed.
    Ignored(AnswerFeedback),
}

impl SubmitOutcome {
    pub fn feedback(&self) -> &AnswerFeedback {
        match self {
            SubmitOutcome::Accepted(f) | SubmitOutcome::Ignored(f) => f,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    NextQuestion(usize),
    Finished(QuizAttempt),
}

#[derive(Clone, Debug)]
struct PendingAnswer {
    answer: StudentAnswer,
    correct_option_index: usize,
}

impl PendingAnswer {
    fn feedback(&self) -> AnswerFeedback {
        AnswerFeedback {
            question_id: self.answer.question_id.clone(),
            selected_option_index: self.answer.selected_option_index,
            is_correct: self.answer.is_correct,
            correct_option_index: self.correct_option_index,
        }
    }
}

#[derive(Clone, Debug)]
enum Phase {
    NotStarted,
    Empty,
    InProgress,
    AnsweredPending(PendingAnswer),
    Finished(QuizAttempt),
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    id: String,
    setup: Option<SessionSetup>,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<StudentAnswer>,
    phase: Phase,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive upper bound for shuffle seeds. Every seed below it is exactly
/// representable as an `f64`, so it survives a JSON number round trip.
pub const SEED_LIMIT: u64 = 1 << 53;

/// Seeded Fisher-Yates; the same seed always yields the same order.
pub fn shuffle_questions(questions: &mut [Question], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    questions.shuffle(&mut rng);
}

pub fn random_seed() -> u64 {
    rand::thread_rng().gen_range(0..SEED_LIMIT)
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            setup: None,
            questions: Vec::new(),
            current_index: 0,
            answers: Vec::new(),
            phase: Phase::NotStarted,
        }
    }

    /// Selects the grade/topic subset of `bank` and shuffles it with `seed`.
    /// An empty selection is a normal outcome and leaves the session `Empty`.
    pub fn start(
        &mut self,
        student_name: &str,
        grade_level: Option<GradeLevel>,
        topic: TopicFilter,
        bank: Vec<Question>,
        seed: u64,
    ) -> AppResult<SessionStatus> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(AppError::InvalidState(
                "Session has already been started".to_string(),
            ));
        }

        let student_name = student_name.trim();
        if student_name.is_empty() {
            return Err(AppError::ValidationError(
                "Student name must not be empty".to_string(),
            ));
        }
        let grade_level = grade_level.ok_or_else(|| {
            AppError::ValidationError("A grade level must be selected".to_string())
        })?;
        if seed >= SEED_LIMIT {
            return Err(AppError::ValidationError(format!(
                "seed must be below {}",
                SEED_LIMIT
            )));
        }

        let mut questions: Vec<Question> = bank
            .into_iter()
            .filter(|q| q.matches(grade_level, &topic))
            .collect();
        shuffle_questions(&mut questions, seed);

        self.phase = if questions.is_empty() {
            Phase::Empty
        } else {
            Phase::InProgress
        };
        self.questions = questions;
        self.current_index = 0;
        self.setup = Some(SessionSetup {
            student_name: student_name.to_string(),
            grade_level,
            topic,
            seed,
        });

        Ok(self.status())
    }

    /// Grades `option_index` against the current question and holds the answer
    /// until `complete_pending` is called.
    pub fn submit_answer(
        &mut self,
        option_index: usize,
        time_spent_seconds: f64,
    ) -> AppResult<SubmitOutcome> {
        match &self.phase {
            Phase::AnsweredPending(pending) => return Ok(SubmitOutcome::Ignored(pending.feedback())),
            Phase::InProgress => {}
            _ => {
                return Err(AppError::InvalidState(format!(
                    "Cannot answer while session is {:?}",
                    self.status()
                )))
            }
        }

        if option_index >= OPTION_COUNT {
            return Err(AppError::ValidationError(format!(
                "optionIndex must be below {}, got {}",
                OPTION_COUNT, option_index
            )));
        }

        let question = self.questions.get(self.current_index).ok_or_else(|| {
            AppError::InternalError("Current question index out of range".to_string())
        })?;

        let time_spent_seconds = if time_spent_seconds.is_finite() && time_spent_seconds > 0.0 {
            time_spent_seconds
        } else {
            0.0
        };

        let pending = PendingAnswer {
            answer: StudentAnswer {
                question_id: question.id.clone(),
                selected_option_index: option_index,
                is_correct: question.is_correct(option_index),
                time_spent_seconds,
            },
            correct_option_index: question.correct_option_index,
        };
        let feedback = pending.feedback();
        self.phase = Phase::AnsweredPending(pending);

        Ok(SubmitOutcome::Accepted(feedback))
    }

    /// Commits the pending answer and moves on. Returns `None` when nothing
    /// was pending, so a late or repeated call never emits a second attempt.
    pub fn complete_pending(&mut self) -> Option<Advance> {
        let Phase::AnsweredPending(pending) = &self.phase else {
            return None;
        };
        let setup = self.setup.as_ref()?;

        self.answers.push(pending.answer.clone());

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.phase = Phase::InProgress;
            return Some(Advance::NextQuestion(self.current_index));
        }

        let attempt = QuizAttempt::from_answers(
            &setup.student_name,
            setup.grade_level,
            self.answers.clone(),
        );
        self.phase = Phase::Finished(attempt.clone());
        Some(Advance::Finished(attempt))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> SessionStatus {
        match self.phase {
            Phase::NotStarted => SessionStatus::NotStarted,
            Phase::Empty => SessionStatus::Empty,
            Phase::InProgress => SessionStatus::InProgress,
            Phase::AnsweredPending(_) => SessionStatus::AnsweredPending,
            Phase::Finished(_) => SessionStatus::Finished,
        }
    }

    pub fn setup(&self) -> Option<&SessionSetup> {
        self.setup.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen; `None` outside `InProgress`/`AnsweredPending`.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::InProgress | Phase::AnsweredPending(_) => self.questions.get(self.current_index),
            _ => None,
        }
    }

    pub fn answers(&self) -> &[StudentAnswer] {
        &self.answers
    }

    pub fn pending_feedback(&self) -> Option<AnswerFeedback> {
        match &self.phase {
            Phase::AnsweredPending(pending) => Some(pending.feedback()),
            _ => None,
        }
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        match &self.phase {
            Phase::Finished(attempt) => Some(attempt),
            _ => None,
        }
    }
}
