use chrono::{DateTime, Utc};

use super::{ContestId, Language, ProblemId, Score, SubmissionId, SubmissionStatus, UserId};

/// A submission as last reported by the judge.
///
/// `score`, `execution_time_ms` and `memory_used_kb` only carry results once
/// `status` is terminal; they are zero while the submission is queued or running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub contest_id: ContestId,
    pub problem_id: ProblemId,
    pub user_id: UserId,
    pub code: String,
    pub language: Language,
    pub status: SubmissionStatus,
    pub score: Score,
    pub execution_time_ms: u32,
    pub memory_used_kb: u32,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Everything needed to submit source code for judging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub contest_id: ContestId,
    pub problem_id: ProblemId,
    pub user_id: UserId,
    pub code: String,
    pub language: Language,
}

impl SubmissionRequest {
    pub fn has_code(&self) -> bool {
        !self.code.trim().is_empty()
    }
}
