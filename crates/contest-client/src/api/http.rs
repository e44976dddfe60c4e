//! JSON-over-HTTP contest backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use shodh_api_types::{
    ContestDto, ErrorResponse, LeaderboardEntryDto, SubmissionDto, SubmitCodeResponse,
};
use shodh_core::domain::{
    Contest, ContestId, Leaderboard, Submission, SubmissionId, SubmissionRequest,
};
use tracing::debug;

use super::ContestApi;
use super::convert::{contest_from_dto, leaderboard_from_dto, request_to_dto, submission_from_dto};
use crate::error::{ClientError, Result};

pub struct HttpContestApi {
    http: Client,
    base_url: Url,
}

impl HttpContestApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ClientError::Config(format!("invalid api base url '{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "api base url cannot carry a path: {base_url}"
            )));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|error| error.message)
            .unwrap_or(body);

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(message));
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ContestApi for HttpContestApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn get_contest(&self, contest_id: &ContestId) -> Result<Contest> {
        let url = self.endpoint(&["contests", contest_id.as_str()]);
        let dto: ContestDto = self.get_json(url).await?;
        contest_from_dto(dto)
    }

    async fn get_leaderboard(&self, contest_id: &ContestId) -> Result<Leaderboard> {
        let url = self.endpoint(&["contests", contest_id.as_str(), "leaderboard"]);
        let entries: Vec<LeaderboardEntryDto> = self.get_json(url).await?;
        leaderboard_from_dto(entries)
    }

    async fn submit_code(&self, request: &SubmissionRequest) -> Result<SubmissionId> {
        if !request.has_code() {
            return Err(ClientError::EmptySourceCode);
        }

        let url = self.endpoint(&["submissions"]);
        debug!(%url, problem_id = %request.problem_id, "POST");
        let response = self
            .http
            .post(url)
            .json(&request_to_dto(request))
            .send()
            .await?;
        let created: SubmitCodeResponse = Self::decode(response).await?;
        Ok(SubmissionId::new(created.submission_id)?)
    }

    async fn get_submission(&self, submission_id: &SubmissionId) -> Result<Submission> {
        let url = self.endpoint(&["submissions", submission_id.as_str()]);
        let dto: SubmissionDto = self.get_json(url).await?;
        submission_from_dto(dto)
    }
}
