use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::Instant};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            quiz_session::{random_seed, Advance, SubmitOutcome},
            QuizSession, SessionStatus,
        },
        dto::{
            request::{StartSessionRequest, SubmitAnswerRequest},
            response::{SessionView, SubmitAnswerResponse},
        },
    },
    repositories::{QuestionRepository, QuizAttemptRepository},
};

/// How long the final view of a finished or empty session stays readable.
pub const CLOSED_SESSION_RETENTION: Duration = Duration::from_secs(10 * 60);

/// Timer commits tried before a pending answer is left for a manual retry.
const COMMIT_ATTEMPTS: u32 = 3;

struct ClosedSession {
    view: SessionView,
    closed_at: Instant,
}

/// Live sessions plus the final views of recently closed ones. Closed views
/// expire after `CLOSED_SESSION_RETENTION`.
#[derive(Default)]
struct Registry {
    live: HashMap<String, QuizSession>,
    closed: HashMap<String, ClosedSession>,
}

impl Registry {
    fn close(&mut self, session: &QuizSession) {
        self.prune();
        self.closed.insert(
            session.id().to_string(),
            ClosedSession {
                view: SessionView::from(session),
                closed_at: Instant::now(),
            },
        );
    }

    fn prune(&mut self) {
        let now = Instant::now();
        self.closed
            .retain(|_, closed| now.duration_since(closed.closed_at) < CLOSED_SESSION_RETENTION);
    }
}

type SessionMap = Arc<Mutex<Registry>>;

/// Owns live quiz sessions and the timer that ends each feedback pause.
pub struct QuizSessionService {
    sessions: SessionMap,
    question_repository: Arc<dyn QuestionRepository>,
    attempt_repository: Arc<dyn QuizAttemptRepository>,
    feedback_delay: Duration,
}

impl QuizSessionService {
    pub fn new(
        question_repository: Arc<dyn QuestionRepository>,
        attempt_repository: Arc<dyn QuizAttemptRepository>,
        feedback_delay: Duration,
    ) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(Registry::default())),
            question_repository,
            attempt_repository,
            feedback_delay,
        }
    }

    pub async fn start(&self, request: StartSessionRequest) -> AppResult<SessionView> {
        request.validate()?;

        let seed = request.seed.unwrap_or_else(random_seed);
        let bank = self.question_repository.list().await?;

        let mut session = QuizSession::new();
        let status = session.start(
            &request.student_name,
            request.grade_level,
            request.topic,
            bank,
            seed,
        )?;

        log::info!(
            "Session {} started for '{}' ({} questions, seed {}, {:?})",
            session.id(),
            request.student_name.trim(),
            session.questions().len(),
            seed,
            status
        );

        let view = SessionView::from(&session);
        let mut sessions = self.sessions.lock().await;
        if status == SessionStatus::Empty {
            sessions.close(&session);
        } else {
            sessions.prune();
            sessions.live.insert(session.id().to_string(), session);
        }
        Ok(view)
    }

    pub async fn view(&self, id: &str) -> AppResult<SessionView> {
        let mut sessions = self.sessions.lock().await;
        sessions.prune();
        if let Some(session) = sessions.live.get(id) {
            return Ok(SessionView::from(session));
        }
        sessions
            .closed
            .get(id)
            .map(|closed| closed.view.clone())
            .ok_or_else(|| session_not_found(id))
    }

    /// Grades the answer now and schedules the commit after the feedback delay.
    pub async fn submit_answer(
        &self,
        id: &str,
        request: SubmitAnswerRequest,
    ) -> AppResult<SubmitAnswerResponse> {
        request.validate()?;

        let outcome = {
            let mut sessions = self.sessions.lock().await;
            let closed_status = sessions.closed.get(id).map(|closed| closed.view.status);
            match sessions.live.get_mut(id) {
                Some(session) => session.submit_answer(
                    request.option_index,
                    request.time_spent_seconds.unwrap_or(0.0),
                )?,
                None => {
                    return Err(match closed_status {
                        Some(status) => AppError::InvalidState(format!(
                            "Cannot answer while session is {:?}",
                            status
                        )),
                        None => session_not_found(id),
                    })
                }
            }
        };

        match outcome {
            SubmitOutcome::Accepted(feedback) => {
                self.schedule_commit(id.to_string());
                Ok(SubmitAnswerResponse {
                    accepted: true,
                    feedback,
                })
            }
            SubmitOutcome::Ignored(feedback) => {
                log::debug!("Session {}: answer ignored, feedback still pending", id);
                Ok(SubmitAnswerResponse {
                    accepted: false,
                    feedback,
                })
            }
        }
    }

    /// Ends the feedback pause immediately. Returns `None` if nothing was
    /// pending or the session is gone.
    pub async fn complete_pending(&self, id: &str) -> AppResult<Option<Advance>> {
        commit_pending(&self.sessions, self.attempt_repository.as_ref(), id).await
    }

    /// Abandons a session in any state. Nothing is persisted.
    pub async fn exit(&self, id: &str) -> AppResult<()> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.live.remove(id) {
            log::info!("Session {} exited while {:?}", id, session.status());
            return Ok(());
        }
        match sessions.closed.remove(id) {
            Some(closed) => {
                log::info!("Session {} exited while {:?}", id, closed.view.status);
                Ok(())
            }
            None => Err(session_not_found(id)),
        }
    }

    pub async fn clear(&self) {
        let mut sessions = self.sessions.lock().await;
        let dropped = sessions.live.len();
        sessions.live.clear();
        sessions.closed.clear();
        log::info!("Dropped {} live sessions", dropped);
    }

    /// Sessions still being played. Finished and empty ones are not counted.
    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.live.len()
    }

    fn schedule_commit(&self, id: String) {
        let sessions = Arc::clone(&self.sessions);
        let attempts = Arc::clone(&self.attempt_repository);
        let delay = self.feedback_delay;

        tokio::spawn(async move {
            for attempt in 1..=COMMIT_ATTEMPTS {
                tokio::time::sleep(delay).await;
                match commit_pending(&sessions, attempts.as_ref(), &id).await {
                    Ok(_) => return,
                    Err(e) => log::error!(
                        "Session {}: commit {} of {} failed: {}",
                        id,
                        attempt,
                        COMMIT_ATTEMPTS,
                        e
                    ),
                }
            }
        });
    }
}

/// Commits the pending answer of a live session. A finished attempt is
/// appended while the registry is still locked, so a concurrent reset or exit
/// cannot interleave; if the append fails the answer stays pending.
async fn commit_pending(
    sessions: &SessionMap,
    attempts: &dyn QuizAttemptRepository,
    id: &str,
) -> AppResult<Option<Advance>> {
    let mut registry = sessions.lock().await;
    let Some(session) = registry.live.get_mut(id) else {
        return Ok(None);
    };

    let before_commit = session.clone();
    let advance = session.complete_pending();

    if let Some(Advance::Finished(attempt)) = &advance {
        if let Err(e) = attempts.append(attempt.clone()).await {
            *session = before_commit;
            return Err(e);
        }
        log::info!(
            "Session {} finished: {} scored {}/{}",
            id,
            attempt.student_name,
            attempt.score,
            attempt.total_questions
        );

        if let Some(finished) = registry.live.remove(id) {
            registry.close(&finished);
        }
    }

    Ok(advance)
}

fn session_not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Session with id '{}' not found", id))
}
