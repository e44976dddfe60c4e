//! A contestant's view of one contest.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use shodh_core::domain::{
    Contest, DomainError, Language, Leaderboard, Problem, ProblemId, SessionContext, SubmissionId,
    SubmissionRequest,
};
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::api::ContestApi;
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, EventBroadcaster};
use crate::leaderboard::{LeaderboardSnapshot, LeaderboardWatcher};
use crate::poller::{PollState, SubmissionPoller};

/// Contest page state: the loaded contest, the selected problem, the
/// standings, and the status of the latest submission.
pub struct ContestSession {
    api: Arc<dyn ContestApi>,
    context: SessionContext,
    events: Arc<EventBroadcaster>,
    poller: SubmissionPoller,
    leaderboard_refresh: Duration,
    contest: Option<Contest>,
    leaderboard: LeaderboardSnapshot,
    selected_problem: Option<ProblemId>,
    last_submission: Option<SubmissionId>,
}

impl ContestSession {
    pub fn new(
        api: Arc<dyn ContestApi>,
        context: SessionContext,
        events: Arc<EventBroadcaster>,
        poller: SubmissionPoller,
        leaderboard_refresh: Duration,
    ) -> Self {
        Self {
            api,
            context,
            events,
            poller,
            leaderboard_refresh,
            contest: None,
            leaderboard: LeaderboardSnapshot::default(),
            selected_problem: None,
            last_submission: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn contest(&self) -> Option<&Contest> {
        self.contest.as_ref()
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard.leaderboard
    }

    pub fn last_submission(&self) -> Option<&SubmissionId> {
        self.last_submission.as_ref()
    }

    /// Fetches the contest and its leaderboard concurrently and selects the
    /// first problem.
    #[instrument(skip(self), fields(contest_id = %self.context.contest_id()))]
    pub async fn load(&mut self) -> Result<&Contest> {
        let contest_id = self.context.contest_id();
        let (contest, leaderboard) = tokio::try_join!(
            self.api.get_contest(contest_id),
            self.api.get_leaderboard(contest_id),
        )?;

        info!(
            problems = contest.problems.len(),
            leaderboard_entries = leaderboard.len(),
            "contest loaded"
        );

        self.events.emit(ClientEvent::ContestLoaded {
            contest_id: contest_id.clone(),
            problem_count: contest.problems.len(),
        });

        self.selected_problem = contest.first_problem().map(|problem| problem.id.clone());
        self.leaderboard = LeaderboardSnapshot {
            leaderboard,
            updated_at: Some(Utc::now()),
        };
        Ok(self.contest.insert(contest))
    }

    pub fn selected_problem(&self) -> Option<&Problem> {
        let contest = self.contest.as_ref()?;
        contest.problem(self.selected_problem.as_ref()?)
    }

    pub fn select_problem(&mut self, problem_id: &ProblemId) -> Result<&Problem> {
        let contest = self.contest.as_ref().ok_or(ClientError::ContestNotLoaded)?;
        let problem = contest
            .problem(problem_id)
            .ok_or_else(|| ClientError::ProblemNotFound(problem_id.to_string()))?;
        self.selected_problem = Some(problem.id.clone());
        Ok(problem)
    }

    /// Submits code for the selected problem and starts following its status.
    ///
    /// A previous submission's poll is cancelled.
    #[instrument(skip(self, code), fields(contest_id = %self.context.contest_id()))]
    pub async fn submit(&mut self, code: &str, language: Language) -> Result<SubmissionId> {
        if code.trim().is_empty() {
            return Err(ClientError::EmptySourceCode);
        }
        if !language.is_known() {
            return Err(DomainError::UnknownLanguage(language.code().to_string()).into());
        }
        let problem_id = self
            .selected_problem()
            .map(|problem| problem.id.clone())
            .ok_or(ClientError::NoProblemSelected)?;

        let request = SubmissionRequest {
            contest_id: self.context.contest_id().clone(),
            problem_id: problem_id.clone(),
            user_id: self.context.user_id(),
            code: code.to_string(),
            language,
        };
        let submission_id = self.api.submit_code(&request).await?;

        info!(
            submission_id = %submission_id,
            problem_id = %problem_id,
            language = %request.language,
            "code submitted"
        );
        self.events.emit(ClientEvent::SubmissionCreated {
            submission_id: submission_id.clone(),
            problem_id,
        });

        self.poller.watch(submission_id.clone());
        self.last_submission = Some(submission_id.clone());
        Ok(submission_id)
    }

    pub fn submission_state(&self) -> PollState {
        self.poller.state()
    }

    pub fn subscribe_submission(&self) -> watch::Receiver<PollState> {
        self.poller.subscribe()
    }

    /// Stops following the latest submission.
    pub fn stop_polling(&mut self) {
        self.poller.stop();
    }

    pub async fn refresh_leaderboard(&mut self) -> Result<&Leaderboard> {
        let contest_id = self.context.contest_id();
        let leaderboard = self.api.get_leaderboard(contest_id).await?;
        self.events.emit(ClientEvent::LeaderboardUpdated {
            contest_id: contest_id.clone(),
            entries: leaderboard.len(),
        });
        self.leaderboard = LeaderboardSnapshot {
            leaderboard,
            updated_at: Some(Utc::now()),
        };
        Ok(&self.leaderboard.leaderboard)
    }

    /// Spawns a background refresh of this contest's leaderboard.
    pub fn watch_leaderboard(&self) -> LeaderboardWatcher {
        LeaderboardWatcher::spawn(
            Arc::clone(&self.api),
            self.context.contest_id().clone(),
            self.leaderboard_refresh,
            self.leaderboard.clone(),
            Arc::clone(&self.events),
        )
    }
}
