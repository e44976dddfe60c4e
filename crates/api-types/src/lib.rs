//! JSON request/response types exchanged with the contest backend.
//!
//! Field names follow the backend's camelCase wire format. Statuses,
//! languages, difficulties and timestamps stay plain strings here; the client
//! converts them into domain types.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDto {
    pub id: String,
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    /// Seconds.
    pub time_limit: u32,
    /// Megabytes.
    pub memory_limit: u32,
    #[serde(default)]
    pub test_cases: Vec<TestCaseDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub problems: Vec<ProblemDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntryDto {
    pub user_id: String,
    pub username: String,
    pub total_score: u32,
    pub problems_solved: u32,
    pub last_submission_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCodeRequest {
    pub contest_id: String,
    pub problem_id: String,
    pub user_id: String,
    pub code: String,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCodeResponse {
    pub submission_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: String,
    pub contest_id: String,
    pub problem_id: String,
    pub user_id: String,
    #[serde(default)]
    pub code: String,
    pub language: String,
    pub status: String,
    #[serde(default)]
    pub score: u16,
    /// Milliseconds; zero until judged.
    #[serde(default)]
    pub execution_time: u32,
    /// Kilobytes; zero until judged.
    #[serde(default)]
    pub memory_used: u32,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "not_found".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_uses_camel_case_wire_names() {
        let raw = r#"{
            "id": "42",
            "contestId": "1",
            "problemId": "1",
            "userId": "demo_user",
            "code": "// Your submitted code here",
            "language": "javascript",
            "status": "Time Limit Exceeded",
            "score": 0,
            "executionTime": 250,
            "memoryUsed": 1024,
            "submittedAt": "2024-01-15T14:30:00.000Z"
        }"#;

        let dto: SubmissionDto = serde_json::from_str(raw).expect("deserialize submission");

        assert_eq!(dto.status, "Time Limit Exceeded");
        assert_eq!(dto.execution_time, 250);
        assert_eq!(dto.memory_used, 1024);
        assert_eq!(dto.submitted_at, "2024-01-15T14:30:00.000Z");
    }

    #[test]
    fn pending_submission_may_omit_results() {
        let raw = r#"{
            "id": "7",
            "contestId": "1",
            "problemId": "2",
            "userId": "bob_dev",
            "language": "python",
            "status": "Pending",
            "submittedAt": "2024-01-15T14:30:00Z"
        }"#;

        let dto: SubmissionDto = serde_json::from_str(raw).expect("deserialize submission");

        assert_eq!(dto.score, 0);
        assert_eq!(dto.execution_time, 0);
        assert!(dto.code.is_empty());
    }

    #[test]
    fn submit_response_serializes_submission_id() {
        let response = SubmitCodeResponse {
            submission_id: "1234".to_string(),
        };

        let json = serde_json::to_value(&response).expect("serialize submit response");

        assert_eq!(json, serde_json::json!({ "submissionId": "1234" }));
    }
}
