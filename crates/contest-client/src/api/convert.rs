//! Conversions between wire DTOs and domain types.

use chrono::{DateTime, NaiveDateTime, Utc};
use shodh_api_types::{
    ContestDto, LeaderboardEntryDto, ProblemDto, SubmissionDto, SubmitCodeRequest, TestCaseDto,
};
use shodh_core::domain::{
    Contest, ContestId, Language, Leaderboard, LeaderboardEntry, Problem, ProblemId, Score,
    Submission, SubmissionId, SubmissionRequest, SubmissionStatus, TestCase, TestCaseId, UserId,
};

use crate::error::{ClientError, Result};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a backend timestamp, with or without an offset.
///
/// Offset-less timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    parse_naive(raw).map(|naive| naive.and_utc())
}

fn parse_naive(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| ClientError::InvalidResponse(format!("invalid timestamp: '{raw}'")))
}

pub fn contest_from_dto(dto: ContestDto) -> Result<Contest> {
    Ok(Contest {
        id: ContestId::new(dto.id)?,
        name: dto.name,
        description: dto.description,
        start_time: parse_naive(&dto.start_time)?,
        end_time: parse_naive(&dto.end_time)?,
        problems: dto
            .problems
            .into_iter()
            .map(problem_from_dto)
            .collect::<Result<_>>()?,
    })
}

fn problem_from_dto(dto: ProblemDto) -> Result<Problem> {
    Ok(Problem {
        id: ProblemId::new(dto.id)?,
        title: dto.title,
        description: dto.description,
        difficulty: dto.difficulty.parse()?,
        time_limit_secs: dto.time_limit,
        memory_limit_mb: dto.memory_limit,
        test_cases: dto
            .test_cases
            .into_iter()
            .map(test_case_from_dto)
            .collect::<Result<_>>()?,
    })
}

fn test_case_from_dto(dto: TestCaseDto) -> Result<TestCase> {
    Ok(TestCase {
        id: TestCaseId::new(dto.id)?,
        input: dto.input,
        expected_output: dto.expected_output,
    })
}

pub fn leaderboard_from_dto(entries: Vec<LeaderboardEntryDto>) -> Result<Leaderboard> {
    let entries = entries
        .into_iter()
        .map(|dto| -> Result<LeaderboardEntry> {
            Ok(LeaderboardEntry {
                user_id: UserId::new(dto.user_id)?,
                username: dto.username,
                total_score: dto.total_score,
                problems_solved: dto.problems_solved,
                last_submission_time: parse_naive(&dto.last_submission_time)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Leaderboard::new(entries))
}

pub fn submission_from_dto(dto: SubmissionDto) -> Result<Submission> {
    Ok(Submission {
        id: SubmissionId::new(dto.id)?,
        contest_id: ContestId::new(dto.contest_id)?,
        problem_id: ProblemId::new(dto.problem_id)?,
        user_id: UserId::new(dto.user_id)?,
        code: dto.code,
        language: Language::from_label(&dto.language),
        status: SubmissionStatus::from_label(&dto.status),
        score: Score::new(dto.score)?,
        execution_time_ms: dto.execution_time,
        memory_used_kb: dto.memory_used,
        submitted_at: parse_timestamp(&dto.submitted_at)?,
    })
}

pub fn submission_to_dto(submission: &Submission) -> SubmissionDto {
    SubmissionDto {
        id: submission.id.to_string(),
        contest_id: submission.contest_id.to_string(),
        problem_id: submission.problem_id.to_string(),
        user_id: submission.user_id.to_string(),
        code: submission.code.clone(),
        language: submission.language.code().to_string(),
        status: submission.status.label().to_string(),
        score: submission.score.value(),
        execution_time: submission.execution_time_ms,
        memory_used: submission.memory_used_kb,
        submitted_at: submission.submitted_at.to_rfc3339(),
    }
}

pub fn request_to_dto(request: &SubmissionRequest) -> SubmitCodeRequest {
    SubmitCodeRequest {
        contest_id: request.contest_id.to_string(),
        problem_id: request.problem_id.to_string(),
        user_id: request.user_id.to_string(),
        code: request.code.clone(),
        language: request.language.code().to_string(),
    }
}

pub fn request_from_dto(dto: SubmitCodeRequest) -> Result<SubmissionRequest> {
    Ok(SubmissionRequest {
        contest_id: ContestId::new(dto.contest_id)?,
        problem_id: ProblemId::new(dto.problem_id)?,
        user_id: UserId::new(dto.user_id)?,
        code: dto.code,
        language: dto.language.parse()?,
    })
}
