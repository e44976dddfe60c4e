use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::{Score, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub username: String,
    pub total_score: u32,
    pub problems_solved: u32,
    pub last_submission_time: NaiveDateTime,
}

/// Contest standings, always kept in rank order.
///
/// Higher total score ranks first; ties go to whoever reached the score
/// earlier, then to the smaller user id so the order is total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub const PODIUM_SIZE: usize = 3;

    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        let mut leaderboard = Self { entries };
        leaderboard.sort();
        leaderboard
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based rank of a user, if present.
    pub fn rank_of(&self, user_id: &UserId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| &entry.user_id == user_id)
            .map(|index| index + 1)
    }

    pub fn podium(&self) -> &[LeaderboardEntry] {
        let end = self.entries.len().min(Self::PODIUM_SIZE);
        &self.entries[..end]
    }

    /// Credits a newly solved problem to a user, creating the entry if needed.
    pub fn record_solved(
        &mut self,
        user_id: &UserId,
        username: &str,
        score: Score,
        at: NaiveDateTime,
    ) {
        match self.entries.iter_mut().find(|entry| &entry.user_id == user_id) {
            Some(entry) => {
                entry.total_score += u32::from(score);
                entry.problems_solved += 1;
                entry.last_submission_time = entry.last_submission_time.max(at);
            }
            None => self.entries.push(LeaderboardEntry {
                user_id: user_id.clone(),
                username: username.to_string(),
                total_score: u32::from(score),
                problems_solved: 1,
                last_submission_time: at,
            }),
        }
        self.sort();
    }

    fn sort(&mut self) {
        self.entries.sort_by(compare_entries);
    }
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_score
        .cmp(&a.total_score)
        .then_with(|| a.last_submission_time.cmp(&b.last_submission_time))
        .then_with(|| a.user_id.cmp(&b.user_id))
}
