//! Periodic leaderboard refresh.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use shodh_core::domain::{ContestId, Leaderboard};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ContestApi;
use crate::events::{ClientEvent, EventBroadcaster};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardSnapshot {
    pub leaderboard: Leaderboard,
    /// When the leaderboard was last fetched successfully.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Keeps a leaderboard fresh by refetching it on a fixed interval.
///
/// Failed refreshes are logged and the previous standings are kept. The
/// background task stops when the watcher is dropped.
pub struct LeaderboardWatcher {
    snapshot: watch::Receiver<LeaderboardSnapshot>,
    cancel: CancellationToken,
}

impl LeaderboardWatcher {
    pub fn spawn(
        api: Arc<dyn ContestApi>,
        contest_id: ContestId,
        interval: Duration,
        initial: LeaderboardSnapshot,
        events: Arc<EventBroadcaster>,
    ) -> Self {
        let interval = interval.max(Duration::from_millis(1));
        let (sender, snapshot) = watch::channel(initial);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let refreshed = tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => break,
                    refreshed = api.get_leaderboard(&contest_id) => refreshed,
                };

                match refreshed {
                    Ok(leaderboard) => {
                        let entries = leaderboard.len();
                        sender.send_replace(LeaderboardSnapshot {
                            leaderboard,
                            updated_at: Some(Utc::now()),
                        });
                        events.emit(ClientEvent::LeaderboardUpdated {
                            contest_id: contest_id.clone(),
                            entries,
                        });
                        debug!(contest_id = %contest_id, entries, "leaderboard refreshed");
                    }
                    Err(err) => {
                        warn!(contest_id = %contest_id, error = %err, "failed to refresh leaderboard");
                    }
                }
            }
            debug!(contest_id = %contest_id, "leaderboard watcher stopped");
        });

        Self { snapshot, cancel }
    }

    pub fn snapshot(&self) -> LeaderboardSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LeaderboardSnapshot> {
        self.snapshot.clone()
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for LeaderboardWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
