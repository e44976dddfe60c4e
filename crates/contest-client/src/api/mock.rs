//! In-memory contest backend with simulated latency and judging.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shodh_core::domain::{
    Contest, ContestId, Language, Leaderboard, ProblemId, Score, Submission, SubmissionId,
    SubmissionRequest, SubmissionStatus, UserId,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::convert::{contest_from_dto, leaderboard_from_dto};
use super::{ContestApi, fixtures};
use crate::config::MockConfig;
use crate::error::{ClientError, Result};

const MAX_SUBMISSION_ID: u32 = 10_000;
const RANDOM_ID_DRAWS: usize = 32;
const PENDING_POLLS: u32 = 1;
const RUNNING_POLLS: u32 = 1;

const VERDICTS: [SubmissionStatus; 4] = [
    SubmissionStatus::Accepted,
    SubmissionStatus::WrongAnswer,
    SubmissionStatus::TimeLimitExceeded,
    SubmissionStatus::RuntimeError,
];

/// Artificial delay applied before each backend call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub contest: Duration,
    pub leaderboard: Duration,
    pub submit: Duration,
    pub submission: Duration,
}

impl MockLatency {
    pub fn none() -> Self {
        Self {
            contest: Duration::ZERO,
            leaderboard: Duration::ZERO,
            submit: Duration::ZERO,
            submission: Duration::ZERO,
        }
    }

    pub fn from_config(config: &MockConfig) -> Self {
        Self {
            contest: Duration::from_millis(config.contest_delay_ms),
            leaderboard: Duration::from_millis(config.leaderboard_delay_ms),
            submit: Duration::from_millis(config.submit_delay_ms),
            submission: Duration::from_millis(config.submission_delay_ms),
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self::from_config(&MockConfig::default())
    }
}

/// Judge outcome, drawn once when a submission is first seen.
#[derive(Debug, Clone)]
struct Verdict {
    status: SubmissionStatus,
    execution_time_ms: u32,
    memory_used_kb: u32,
}

#[derive(Debug)]
struct MockSubmission {
    submission: Submission,
    verdict: Verdict,
    polls: u32,
}

impl MockSubmission {
    /// Advances judging by one poll. Once the verdict is reached it never changes.
    fn advance(&mut self) -> &Submission {
        self.polls = self.polls.saturating_add(1);
        if self.submission.is_terminal() {
            return &self.submission;
        }

        if self.polls <= PENDING_POLLS {
            self.submission.status = SubmissionStatus::Pending;
        } else if self.polls <= PENDING_POLLS + RUNNING_POLLS {
            self.submission.status = SubmissionStatus::Running;
        } else {
            let verdict = &self.verdict;
            self.submission.status = verdict.status.clone();
            self.submission.execution_time_ms = verdict.execution_time_ms;
            self.submission.memory_used_kb = verdict.memory_used_kb;
            self.submission.score = if verdict.status.is_accepted() {
                Score::new(fixtures::ACCEPTED_SCORE).unwrap_or_default()
            } else {
                Score::zero()
            };
        }
        &self.submission
    }
}

struct MockState {
    rng: StdRng,
    submissions: HashMap<SubmissionId, MockSubmission>,
    leaderboard: Leaderboard,
    solved: HashSet<(UserId, ProblemId)>,
}

impl MockState {
    fn draw_verdict(&mut self) -> Verdict {
        let status = VERDICTS[self.rng.random_range(0..VERDICTS.len())].clone();
        Verdict {
            status,
            execution_time_ms: self.rng.random_range(100..600),
            memory_used_kb: self.rng.random_range(512..2560),
        }
    }

    /// Draws a free id from `1..=MAX_SUBMISSION_ID`, falling back to the
    /// lowest free id once random draws keep colliding.
    fn next_submission_id(&mut self) -> Result<SubmissionId> {
        for _ in 0..RANDOM_ID_DRAWS {
            let candidate = self.rng.random_range(1..=MAX_SUBMISSION_ID);
            if let Some(id) = self.free_id(candidate) {
                return Ok(id);
            }
        }
        (1..=MAX_SUBMISSION_ID)
            .find_map(|candidate| self.free_id(candidate))
            .ok_or_else(|| ClientError::Api {
                status: 503,
                message: format!("all {MAX_SUBMISSION_ID} submission ids are in use"),
            })
    }

    fn free_id(&self, candidate: u32) -> Option<SubmissionId> {
        SubmissionId::new(candidate.to_string())
            .ok()
            .filter(|id| !self.submissions.contains_key(id))
    }

    fn register(&mut self, id: SubmissionId, request: SubmissionRequest) -> &mut MockSubmission {
        let verdict = self.draw_verdict();
        let submission = Submission {
            id: id.clone(),
            contest_id: request.contest_id,
            problem_id: request.problem_id,
            user_id: request.user_id,
            code: request.code,
            language: request.language,
            status: SubmissionStatus::Pending,
            score: Score::zero(),
            execution_time_ms: 0,
            memory_used_kb: 0,
            submitted_at: Utc::now(),
        };
        self.submissions.entry(id).or_insert(MockSubmission {
            submission,
            verdict,
            polls: 0,
        })
    }

    fn credit_if_solved(&mut self, submission: &Submission) {
        if !submission.status.is_accepted() {
            return;
        }
        let key = (submission.user_id.clone(), submission.problem_id.clone());
        if self.solved.insert(key) {
            self.leaderboard.record_solved(
                &submission.user_id,
                submission.user_id.as_str(),
                submission.score,
                submission.submitted_at.naive_utc(),
            );
        }
    }
}

/// Contest backend that never leaves the process.
///
/// Every contest id resolves to the fixture contest. Submissions move through
/// `Pending`, `Running` and then a verdict drawn when the submission is first
/// seen; ids that were never submitted are registered on their first poll.
pub struct MockContestApi {
    latency: MockLatency,
    failure_rate: f64,
    state: Mutex<MockState>,
}

impl MockContestApi {
    pub fn new(latency: MockLatency, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            latency,
            failure_rate: 0.0,
            state: Mutex::new(MockState {
                rng,
                submissions: HashMap::new(),
                leaderboard: leaderboard_from_dto(fixtures::leaderboard())?,
                solved: HashSet::new(),
            }),
        })
    }

    pub fn from_config(config: &MockConfig) -> Result<Self> {
        Ok(Self::new(MockLatency::from_config(config), config.seed)?
            .with_failure_rate(config.submission_failure_rate))
    }

    /// Probability that a submission lookup fails, clamped to `[0, 1]`.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    fn fixture_request(submission_id: &SubmissionId) -> Result<SubmissionRequest> {
        debug!(submission_id = %submission_id, "registering unknown submission");
        Ok(SubmissionRequest {
            contest_id: ContestId::new(fixtures::CONTEST_ID)?,
            problem_id: ProblemId::new("1")?,
            user_id: UserId::new("demo_user")?,
            code: "// Your submitted code here".to_string(),
            language: Language::JavaScript,
        })
    }
}

#[async_trait]
impl ContestApi for MockContestApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_contest(&self, contest_id: &ContestId) -> Result<Contest> {
        tokio::time::sleep(self.latency.contest).await;
        debug!(contest_id = %contest_id, "serving fixture contest");

        let mut contest = contest_from_dto(fixtures::contest())?;
        contest.id = contest_id.clone();
        Ok(contest)
    }

    async fn get_leaderboard(&self, contest_id: &ContestId) -> Result<Leaderboard> {
        tokio::time::sleep(self.latency.leaderboard).await;
        debug!(contest_id = %contest_id, "serving mock leaderboard");

        let state = self.state.lock().await;
        Ok(state.leaderboard.clone())
    }

    async fn submit_code(&self, request: &SubmissionRequest) -> Result<SubmissionId> {
        tokio::time::sleep(self.latency.submit).await;

        if !request.has_code() {
            return Err(ClientError::EmptySourceCode);
        }
        let contest = fixtures::contest();
        if !contest
            .problems
            .iter()
            .any(|problem| problem.id == request.problem_id.as_str())
        {
            return Err(ClientError::ProblemNotFound(request.problem_id.to_string()));
        }

        let mut state = self.state.lock().await;
        let id = state.next_submission_id()?;
        state.register(id.clone(), request.clone());

        info!(
            submission_id = %id,
            problem_id = %request.problem_id,
            user_id = %request.user_id,
            language = %request.language,
            "mock submission queued"
        );
        Ok(id)
    }

    async fn get_submission(&self, submission_id: &SubmissionId) -> Result<Submission> {
        tokio::time::sleep(self.latency.submission).await;

        let mut state = self.state.lock().await;
        if self.failure_rate > 0.0 && state.rng.random_bool(self.failure_rate) {
            debug!(submission_id = %submission_id, "injecting mock judge failure");
            return Err(ClientError::Api {
                status: 503,
                message: "judge temporarily unavailable".to_string(),
            });
        }

        let state = &mut *state;
        if !state.submissions.contains_key(submission_id) {
            let request = Self::fixture_request(submission_id)?;
            state.register(submission_id.clone(), request);
        }
        let submission = state
            .submissions
            .get_mut(submission_id)
            .map(|entry| entry.advance().clone())
            .ok_or_else(|| ClientError::NotFound(format!("submission {submission_id}")))?;
        state.credit_if_solved(&submission);

        debug!(
            submission_id = %submission_id,
            status = %submission.status,
            "serving mock submission"
        );
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(seed: u64) -> MockContestApi {
        MockContestApi::new(MockLatency::none(), Some(seed)).expect("mock api should build")
    }

    fn request(problem: &str, code: &str) -> SubmissionRequest {
        SubmissionRequest {
            contest_id: ContestId::new("1").expect("valid contest id"),
            problem_id: ProblemId::new(problem).expect("valid problem id"),
            user_id: UserId::new("dana").expect("valid user id"),
            code: code.to_string(),
            language: Language::Rust,
        }
    }

    #[tokio::test]
    async fn test_any_contest_id_serves_fixture() {
        let api = api(1);
        let contest_id = ContestId::new("spring-cup").expect("valid contest id");

        let contest = api.get_contest(&contest_id).await.expect("contest loads");

        assert_eq!(contest.id, contest_id);
        assert_eq!(contest.problems.len(), 3);
    }

    #[tokio::test]
    async fn test_submission_progresses_monotonically() {
        let api = api(7);
        let id = api
            .submit_code(&request("1", "fn main() {}"))
            .await
            .expect("submit succeeds");

        let first = api.get_submission(&id).await.expect("first poll");
        let second = api.get_submission(&id).await.expect("second poll");
        let third = api.get_submission(&id).await.expect("third poll");

        assert_eq!(first.status, SubmissionStatus::Pending);
        assert_eq!(second.status, SubmissionStatus::Running);
        assert!(third.is_terminal());
        assert!((100..600).contains(&third.execution_time_ms));
        assert!((512..2560).contains(&third.memory_used_kb));

        for _ in 0..5 {
            let again = api.get_submission(&id).await.expect("later poll");
            assert_eq!(again.status, third.status);
            assert_eq!(again.score, third.score);
        }
    }

    #[tokio::test]
    async fn test_unknown_submission_is_registered_on_first_poll() {
        let api = api(3);
        let id = SubmissionId::new("42").expect("valid submission id");

        let submission = api.get_submission(&id).await.expect("lazy registration");

        assert_eq!(submission.id, id);
        assert_eq!(submission.status, SubmissionStatus::Pending);
        assert_eq!(submission.user_id.as_str(), "demo_user");
    }

    #[tokio::test]
    async fn test_blank_code_and_unknown_problem_are_rejected() {
        let api = api(5);

        let err = api
            .submit_code(&request("1", "   \n"))
            .await
            .expect_err("blank code is rejected");
        assert!(matches!(err, ClientError::EmptySourceCode));

        let err = api
            .submit_code(&request("99", "print(1)"))
            .await
            .expect_err("unknown problem is rejected");
        assert!(matches!(err, ClientError::ProblemNotFound(id) if id == "99"));
    }

    #[tokio::test]
    async fn test_accepted_submission_is_credited_once() {
        let user = UserId::new("dana").expect("valid user id");

        for seed in 0..64 {
            let api = api(seed);
            let id = api
                .submit_code(&request("2", "return x"))
                .await
                .expect("submit succeeds");
            let mut last = None;
            for _ in 0..6 {
                last = Some(api.get_submission(&id).await.expect("poll succeeds"));
            }
            let last = last.expect("polled at least once");
            if !last.status.is_accepted() {
                continue;
            }

            let leaderboard = api
                .get_leaderboard(&ContestId::new("1").expect("valid contest id"))
                .await
                .expect("leaderboard loads");
            let entry = leaderboard
                .entries()
                .iter()
                .find(|entry| entry.user_id == user)
                .expect("accepted user appears on the leaderboard");
            assert_eq!(entry.total_score, 30);
            assert_eq!(entry.problems_solved, 1);
            return;
        }
        panic!("no seed in 0..64 produced an accepted verdict");
    }

    async fn poll_ids(api: &MockContestApi, ids: impl Iterator<Item = u32>) {
        for raw in ids {
            let id = SubmissionId::new(raw.to_string()).expect("valid submission id");
            api.get_submission(&id).await.expect("lazy registration");
        }
    }

    #[tokio::test]
    async fn test_last_free_id_is_found() {
        let api = api(12);
        poll_ids(&api, (1..=MAX_SUBMISSION_ID).filter(|raw| *raw != 4_321)).await;

        let id = api
            .submit_code(&request("1", "fn main() {}"))
            .await
            .expect("one id is still free");

        assert_eq!(id.as_str(), "4321");
    }

    #[tokio::test]
    async fn test_exhausted_id_space_is_an_error() {
        let api = api(13);
        poll_ids(&api, 1..=MAX_SUBMISSION_ID).await;

        let err = api
            .submit_code(&request("1", "fn main() {}"))
            .await
            .expect_err("no ids left");
        assert!(matches!(err, ClientError::Api { status: 503, .. }));

        let known = SubmissionId::new("7").expect("valid submission id");
        api.get_submission(&known)
            .await
            .expect("lookups still work once ids run out");
    }

    #[tokio::test]
    async fn test_failure_rate_one_always_fails() {
        let api = api(11).with_failure_rate(1.0);
        let id = SubmissionId::new("5").expect("valid submission id");

        let err = api
            .get_submission(&id)
            .await
            .expect_err("every lookup fails");

        assert!(matches!(err, ClientError::Api { status: 503, .. }));
    }
}
