use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use contest_client::{ClientError, Result, SubmissionSource};
use shodh_core::domain::{
    ContestId, Language, ProblemId, Score, Submission, SubmissionId, SubmissionStatus, UserId,
};

#[derive(Debug, Clone)]
pub enum Step {
    Respond {
        status: SubmissionStatus,
        score: u16,
        delay: Duration,
    },
    Fail {
        message: String,
        delay: Duration,
    },
}

#[allow(dead_code)]
impl Step {
    pub fn status(status: SubmissionStatus) -> Self {
        let score = if status.is_accepted() { 30 } else { 0 };
        Self::scored(status, score)
    }

    pub fn scored(status: SubmissionStatus, score: u16) -> Self {
        Self::Respond {
            status,
            score,
            delay: Duration::ZERO,
        }
    }

    pub fn fail(message: &str) -> Self {
        Self::Fail {
            message: message.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(self, new_delay: Duration) -> Self {
        match self {
            Self::Respond { status, score, .. } => Self::Respond {
                status,
                score,
                delay: new_delay,
            },
            Self::Fail { message, .. } => Self::Fail {
                message,
                delay: new_delay,
            },
        }
    }

    fn delay(&self) -> Duration {
        match self {
            Self::Respond { delay, .. } | Self::Fail { delay, .. } => *delay,
        }
    }
}

#[allow(dead_code)]
pub fn submission(id: &SubmissionId, status: SubmissionStatus, score: u16) -> Submission {
    let judged = status.is_terminal();
    Submission {
        id: id.clone(),
        contest_id: ContestId::new("1").expect("valid contest id"),
        problem_id: ProblemId::new("1").expect("valid problem id"),
        user_id: UserId::new("demo_user").expect("valid user id"),
        code: "// Your submitted code here".to_string(),
        language: Language::JavaScript,
        status,
        score: Score::new(score).expect("valid score"),
        execution_time_ms: if judged { 120 } else { 0 },
        memory_used_kb: if judged { 1024 } else { 0 },
        submitted_at: Utc
            .with_ymd_and_hms(2024, 1, 15, 14, 30, 0)
            .single()
            .expect("valid timestamp"),
    }
}

#[derive(Default)]
struct Scripts {
    default: Vec<Step>,
    by_id: HashMap<String, Vec<Step>>,
    calls_by_id: HashMap<String, usize>,
    fetched: Vec<String>,
}

/// Submission source that replays a fixed script per submission id.
///
/// The last step of a script repeats once the script is exhausted.
#[derive(Clone)]
pub struct ScriptedSource {
    scripts: Arc<Mutex<Scripts>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(default: Vec<Step>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(Scripts {
                default,
                ..Scripts::default()
            })),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_script(self, submission_id: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .expect("scripts lock")
            .by_id
            .insert(submission_id.to_string(), steps);
        self
    }

    pub fn calls(&self) -> usize {
        self.scripts.lock().expect("scripts lock").fetched.len()
    }

    pub fn fetched_ids(&self) -> Vec<String> {
        self.scripts.lock().expect("scripts lock").fetched.clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_step(&self, submission_id: &SubmissionId) -> Option<Step> {
        let mut scripts = self.scripts.lock().expect("scripts lock");
        let key = submission_id.to_string();
        scripts.fetched.push(key.clone());

        let index = {
            let count = scripts.calls_by_id.entry(key.clone()).or_insert(0);
            *count += 1;
            *count - 1
        };
        let script = scripts.by_id.get(&key).unwrap_or(&scripts.default);
        script.get(index).or_else(|| script.last()).cloned()
    }
}

struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubmissionSource for ScriptedSource {
    async fn fetch_submission(&self, submission_id: &SubmissionId) -> Result<Submission> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        let _guard = InFlight(Arc::clone(&self.in_flight));

        let step = self
            .next_step(submission_id)
            .ok_or_else(|| ClientError::NotFound(format!("no script for {submission_id}")))?;
        tokio::time::sleep(step.delay()).await;

        match step {
            Step::Respond { status, score, .. } => Ok(submission(submission_id, status, score)),
            Step::Fail { message, .. } => Err(ClientError::Api {
                status: 500,
                message,
            }),
        }
    }
}
