use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contest_client::api::convert::request_from_dto;
use contest_client::api::fixtures;
use contest_client::{
    ApiSubmissionSource, ClientError, ContestApi, EventBroadcaster, HttpContestApi, PollPolicy,
    PollState, SubmissionPoller,
};
use shodh_api_types::{ErrorResponse, SubmissionDto, SubmitCodeRequest, SubmitCodeResponse};
use shodh_core::domain::{
    ContestId, Language, ProblemId, SubmissionId, SubmissionRequest, SubmissionStatus, UserId,
};

#[derive(Clone, Default)]
struct Judge {
    polls: Arc<Mutex<HashMap<String, u32>>>,
    submitted: Arc<Mutex<Vec<SubmitCodeRequest>>>,
}

fn error(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

async fn get_contest(Path(contest_id): Path<String>) -> Response {
    if contest_id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("contest missing does not exist")),
        )
            .into_response();
    }
    let mut contest = fixtures::contest();
    contest.id = contest_id;
    Json(contest).into_response()
}

async fn get_leaderboard() -> Response {
    Json(fixtures::leaderboard()).into_response()
}

async fn submit(State(judge): State<Judge>, Json(request): Json<SubmitCodeRequest>) -> Response {
    if request_from_dto(request.clone()).is_err() {
        return error(StatusCode::BAD_REQUEST, "bad_request", "malformed submission");
    }
    judge.submitted.lock().expect("submitted lock").push(request);
    Json(SubmitCodeResponse {
        submission_id: "77".to_string(),
    })
    .into_response()
}

async fn get_submission(
    State(judge): State<Judge>,
    Path(submission_id): Path<String>,
) -> Response {
    if submission_id == "boom" {
        return error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "judge crashed",
        );
    }

    let polls = {
        let mut polls = judge.polls.lock().expect("polls lock");
        let count = polls.entry(submission_id.clone()).or_insert(0);
        *count += 1;
        *count
    };
    let accepted = polls > 1;
    let language = if submission_id.starts_with("kt-") {
        "kotlin"
    } else {
        "rust"
    };
    Json(SubmissionDto {
        id: submission_id,
        contest_id: "1".to_string(),
        problem_id: "1".to_string(),
        user_id: "dana".to_string(),
        code: String::new(),
        language: language.to_string(),
        status: if accepted { "Accepted" } else { "Running" }.to_string(),
        score: if accepted { 30 } else { 0 },
        execution_time: if accepted { 245 } else { 0 },
        memory_used: if accepted { 1024 } else { 0 },
        submitted_at: "2024-01-15T14:30:00".to_string(),
    })
    .into_response()
}

async fn spawn_judge() -> (HttpContestApi, Judge) {
    let judge = Judge::default();
    let app = Router::new()
        .route("/api/contests/{id}", get(get_contest))
        .route("/api/contests/{id}/leaderboard", get(get_leaderboard))
        .route("/api/submissions", post(submit))
        .route("/api/submissions/{id}", get(get_submission))
        .with_state(judge.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    let api = HttpContestApi::new(&format!("http://{addr}"), Duration::from_secs(5))
        .expect("valid base url");
    (api, judge)
}

#[tokio::test]
async fn test_fetches_contest_and_leaderboard() {
    let (api, _judge) = spawn_judge().await;

    let contest = api
        .get_contest(&ContestId::new("9").expect("valid id"))
        .await
        .expect("contest over http");
    assert_eq!(contest.id.as_str(), "9");
    assert_eq!(contest.problems.len(), 3);
    assert_eq!(contest.problems[0].sample_test_cases().len(), 2);

    let leaderboard = api
        .get_leaderboard(&ContestId::new("9").expect("valid id"))
        .await
        .expect("leaderboard over http");
    assert_eq!(leaderboard.len(), 3);
    assert_eq!(leaderboard.rank_of(&UserId::new("bob_dev").expect("valid id")), Some(2));
}

#[tokio::test]
async fn test_not_found_carries_server_message() {
    let (api, _judge) = spawn_judge().await;

    let err = api
        .get_contest(&ContestId::new("missing").expect("valid id"))
        .await
        .expect_err("missing contest");

    assert!(matches!(
        err,
        ClientError::NotFound(message) if message == "contest missing does not exist"
    ));
}

#[tokio::test]
async fn test_submission_is_posted_and_polled_to_verdict() {
    let (api, judge) = spawn_judge().await;
    let request = SubmissionRequest {
        contest_id: ContestId::new("1").expect("valid id"),
        problem_id: ProblemId::new("1").expect("valid id"),
        user_id: UserId::new("dana").expect("valid id"),
        code: "fn main() {}".to_string(),
        language: Language::Rust,
    };

    let submission_id = api.submit_code(&request).await.expect("submission created");
    assert_eq!(submission_id.as_str(), "77");
    {
        let submitted = judge.submitted.lock().expect("submitted lock");
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].language, "rust");
        assert_eq!(submitted[0].user_id, "dana");
    }

    let api: Arc<dyn ContestApi> = Arc::new(api);
    let mut poller = SubmissionPoller::new(
        Arc::new(ApiSubmissionSource::new(Arc::clone(&api))),
        PollPolicy::fixed(Duration::from_millis(20)),
        Arc::new(EventBroadcaster::new(16)),
    );
    poller.watch(submission_id);

    let mut receiver = poller.subscribe();
    let state = receiver
        .wait_for(PollState::is_finished)
        .await
        .expect("state channel open")
        .clone();
    let submission = state.submission().expect("resolved submission");
    assert_eq!(submission.status, SubmissionStatus::Accepted);
    assert_eq!(submission.score.value(), 30);
    assert_eq!(submission.execution_time_ms, 245);
    assert_eq!(judge.polls.lock().expect("polls lock").get("77"), Some(&2));
}

#[tokio::test]
async fn test_server_error_fails_the_poll() {
    let (api, _judge) = spawn_judge().await;

    let err = api
        .get_submission(&SubmissionId::new("boom").expect("valid id"))
        .await
        .expect_err("server error");
    assert!(matches!(
        &err,
        ClientError::Api { status: 500, message } if message == "judge crashed"
    ));

    let mut poller = SubmissionPoller::new(
        Arc::new(ApiSubmissionSource::new(Arc::new(api))),
        PollPolicy::default(),
        Arc::new(EventBroadcaster::new(16)),
    );
    poller.start("boom").expect("valid id");
    let mut receiver = poller.subscribe();
    let state = receiver
        .wait_for(PollState::is_finished)
        .await
        .expect("state channel open")
        .clone();
    assert!(matches!(state, PollState::Failed { .. }));
}

#[tokio::test]
async fn test_submission_in_unlisted_language_resolves() {
    let (api, _judge) = spawn_judge().await;
    let mut poller = SubmissionPoller::new(
        Arc::new(ApiSubmissionSource::new(Arc::new(api))),
        PollPolicy::fixed(Duration::from_millis(20)),
        Arc::new(EventBroadcaster::new(16)),
    );

    poller.start("kt-5").expect("valid id");
    let mut receiver = poller.subscribe();
    let state = receiver
        .wait_for(PollState::is_finished)
        .await
        .expect("state channel open")
        .clone();

    let PollState::Resolved(submission) = state else {
        panic!("expected a resolved submission, got {state:?}");
    };
    assert_eq!(submission.language, Language::Other("kotlin".to_string()));
    assert_eq!(submission.status, SubmissionStatus::Accepted);
}
