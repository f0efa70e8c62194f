use crate::models::{domain::QuizAttempt, dto::response::LeaderboardEntry};

/// `round(100 * score / total)` with halves rounded up; 0 when `total` is 0.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (u64::from(score), u64::from(total));
    ((200 * score + total) / (2 * total)) as u32
}

/// Orders attempts by score, then by recency, both descending. The sort is
/// stable, so full ties keep their stored order.
pub fn rank_attempts(mut attempts: Vec<QuizAttempt>) -> Vec<QuizAttempt> {
    attempts.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| b.timestamp.cmp(&a.timestamp))
    });
    attempts
}

pub fn leaderboard(attempts: Vec<QuizAttempt>) -> Vec<LeaderboardEntry> {
    rank_attempts(attempts)
        .into_iter()
        .enumerate()
        .map(|(i, attempt)| LeaderboardEntry {
            rank: i + 1,
            percentage: percentage(attempt.score, attempt.total_questions),
            attempt_id: attempt.id,
            student_name: attempt.student_name,
            grade_level: attempt.grade_level,
            timestamp: attempt.timestamp,
            score: attempt.score,
            total_questions: attempt.total_questions,
        })
        .collect()
}
