use chrono::NaiveDateTime;

use super::{ContestId, Difficulty, ProblemId, TestCaseId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub id: TestCaseId,
    pub input: String,
    pub expected_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: u32,
    pub memory_limit_mb: u32,
    pub test_cases: Vec<TestCase>,
}

impl Problem {
    /// Number of test cases shown to contestants as examples.
    pub const SAMPLE_COUNT: usize = 2;

    pub fn sample_test_cases(&self) -> &[TestCase] {
        let end = self.test_cases.len().min(Self::SAMPLE_COUNT);
        &self.test_cases[..end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contest {
    pub id: ContestId,
    pub name: String,
    pub description: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub problems: Vec<Problem>,
}

impl Contest {
    pub fn problem(&self, problem_id: &ProblemId) -> Option<&Problem> {
        self.problems.iter().find(|problem| &problem.id == problem_id)
    }

    pub fn first_problem(&self) -> Option<&Problem> {
        self.problems.first()
    }

    /// Letter label (`A`, `B`, ...) of a problem by its position in the contest.
    pub fn problem_label(&self, problem_id: &ProblemId) -> Option<String> {
        let index = self
            .problems
            .iter()
            .position(|problem| &problem.id == problem_id)?;
        Some(label_for_index(index))
    }

    pub fn is_running_at(&self, at: NaiveDateTime) -> bool {
        self.start_time <= at && at < self.end_time
    }
}

fn label_for_index(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    label.iter().rev().collect()
}
