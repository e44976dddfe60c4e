//! Contest backend abstraction.
//!
//! [`ContestApi`] covers everything the contest pages need from a backend.
//! [`SubmissionSource`] is the single capability the status poller depends on,
//! so the poller can be driven by any backend or by a scripted fake.

use std::sync::Arc;

use async_trait::async_trait;
use shodh_core::domain::{
    Contest, ContestId, Leaderboard, Submission, SubmissionId, SubmissionRequest,
};

use crate::error::Result;

pub mod convert;
pub mod fixtures;
pub mod http;
pub mod mock;

pub use http::HttpContestApi;
pub use mock::{MockContestApi, MockLatency};

#[async_trait]
pub trait ContestApi: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    async fn get_contest(&self, contest_id: &ContestId) -> Result<Contest>;

    async fn get_leaderboard(&self, contest_id: &ContestId) -> Result<Leaderboard>;

    /// Queues source code for judging and returns the new submission's id.
    async fn submit_code(&self, request: &SubmissionRequest) -> Result<SubmissionId>;

    async fn get_submission(&self, submission_id: &SubmissionId) -> Result<Submission>;
}

/// Looks up the current state of one submission.
///
/// Implementations may take arbitrarily long and may fail; callers must not
/// assume anything about either.
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    async fn fetch_submission(&self, submission_id: &SubmissionId) -> Result<Submission>;
}

/// Exposes a [`ContestApi`] as a [`SubmissionSource`].
#[derive(Clone)]
pub struct ApiSubmissionSource {
    api: Arc<dyn ContestApi>,
}

impl ApiSubmissionSource {
    pub fn new(api: Arc<dyn ContestApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SubmissionSource for ApiSubmissionSource {
    async fn fetch_submission(&self, submission_id: &SubmissionId) -> Result<Submission> {
        self.api.get_submission(submission_id).await
    }
}
