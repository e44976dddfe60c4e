//! 提交状态轮询。
//!
//! [`SubmissionPoller`] 反复查询同一个提交，直到出现终态或查询失败。
//! 每条轮询链持有一个 `CancellationToken` 和一个代数（generation）标记：
//! 停止、切换提交 ID 或丢弃轮询器都会取消等待中的定时器，
//! 并使仍在进行中的查询结果失效。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shodh_core::domain::{Submission, SubmissionId};
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::SubmissionSource;
use crate::error::Result;
use crate::events::{ClientEvent, EventBroadcaster};

mod policy;

pub use policy::PollPolicy;

/// Message shown when a status lookup fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch submission status";
/// Message shown when the poll policy runs out of attempts or time.
pub const GAVE_UP_MESSAGE: &str = "Gave up waiting for submission result";

/// 轮询器对外暴露的状态。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PollState {
    /// 尚未开始轮询。
    #[default]
    Idle,
    /// 等待终态。`attempt` 为已完成的查询次数，`latest` 为最近一次查询结果。
    Loading {
        submission_id: SubmissionId,
        attempt: u32,
        latest: Option<Submission>,
    },
    /// 已得到终态结果。
    Resolved(Submission),
    /// 查询失败或超出轮询上限。
    Failed {
        submission_id: SubmissionId,
        message: String,
    },
}

impl PollState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// `Resolved` 与 `Failed` 之后不会再有状态变化。
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed { .. })
    }

    pub fn submission_id(&self) -> Option<&SubmissionId> {
        match self {
            Self::Idle => None,
            Self::Loading { submission_id, .. } | Self::Failed { submission_id, .. } => {
                Some(submission_id)
            }
            Self::Resolved(submission) => Some(&submission.id),
        }
    }

    /// 最近一次成功查询到的提交记录。
    pub fn submission(&self) -> Option<&Submission> {
        match self {
            Self::Loading { latest, .. } => latest.as_ref(),
            Self::Resolved(submission) => Some(submission),
            Self::Idle | Self::Failed { .. } => None,
        }
    }

    pub fn phase(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Resolved(_) => "resolved",
            Self::Failed { .. } => "failed",
        }
    }
}

struct PollChain {
    cancel: CancellationToken,
}

/// 单个提交的状态轮询控制器。
pub struct SubmissionPoller {
    source: Arc<dyn SubmissionSource>,
    policy: PollPolicy,
    events: Arc<EventBroadcaster>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<PollState>>,
    chain: Option<PollChain>,
}

impl SubmissionPoller {
    pub fn new(
        source: Arc<dyn SubmissionSource>,
        policy: PollPolicy,
        events: Arc<EventBroadcaster>,
    ) -> Self {
        let (state, _) = watch::channel(PollState::Idle);
        Self {
            source,
            policy,
            events,
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
            chain: None,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// 当前状态快照。
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// 订阅状态变化，接收端总能读到最新状态。
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// 开始轮询 `submission_id`。空白 ID 直接返回错误。
    ///
    /// 已有的轮询链会先被取消，其结果不会再写入状态。
    pub fn start(&mut self, submission_id: &str) -> Result<SubmissionId> {
        let submission_id = SubmissionId::new(submission_id)?;
        self.watch(submission_id.clone());
        Ok(submission_id)
    }

    /// 开始轮询一个已校验的提交 ID。
    pub fn watch(&mut self, submission_id: SubmissionId) {
        self.cancel_chain();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let loading = PollState::Loading {
            submission_id: submission_id.clone(),
            attempt: 0,
            latest: None,
        };
        let events = Arc::clone(&self.events);
        self.state.send_modify(|state| {
            *state = loading.clone();
            events.emit(ClientEvent::PollStateChanged { state: loading });
        });

        info!(submission_id = %submission_id, generation, "starting submission poll");

        let cancel = CancellationToken::new();
        let task = PollTask {
            source: Arc::clone(&self.source),
            policy: self.policy.clone(),
            events: Arc::clone(&self.events),
            generation: Arc::clone(&self.generation),
            state: Arc::clone(&self.state),
            my_generation: generation,
            submission_id,
            cancel: cancel.clone(),
        };
        tokio::spawn(task.run());
        self.chain = Some(PollChain { cancel });
    }

    /// 停止轮询，保留最后的状态。
    pub fn stop(&mut self) {
        if self.cancel_chain() {
            debug!("submission poll stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.chain
            .as_ref()
            .is_some_and(|chain| !chain.cancel.is_cancelled())
            && self.state.borrow().is_loading()
    }

    fn cancel_chain(&mut self) -> bool {
        match self.chain.take() {
            Some(chain) => {
                self.generation.fetch_add(1, Ordering::SeqCst);
                chain.cancel.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for SubmissionPoller {
    fn drop(&mut self) {
        self.cancel_chain();
    }
}

struct PollTask {
    source: Arc<dyn SubmissionSource>,
    policy: PollPolicy,
    events: Arc<EventBroadcaster>,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<PollState>>,
    my_generation: u64,
    submission_id: SubmissionId,
    cancel: CancellationToken,
}

impl PollTask {
    async fn run(self) {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            attempt = attempt.saturating_add(1);
            debug!(submission_id = %self.submission_id, attempt, "fetching submission");

            let outcome = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(submission_id = %self.submission_id, "poll cancelled during fetch");
                    return;
                }
                outcome = self.source.fetch_submission(&self.submission_id) => outcome,
            };

            let next = match outcome {
                Ok(submission) if submission.is_terminal() => {
                    info!(
                        submission_id = %self.submission_id,
                        status = %submission.status,
                        score = submission.score.value(),
                        attempt,
                        "submission resolved"
                    );
                    PollState::Resolved(submission)
                }
                Ok(submission) => {
                    if self.policy.allows_retry(attempt, started.elapsed()) {
                        PollState::Loading {
                            submission_id: self.submission_id.clone(),
                            attempt,
                            latest: Some(submission),
                        }
                    } else {
                        warn!(
                            submission_id = %self.submission_id,
                            attempt,
                            status = %submission.status,
                            "poll limit reached before a final verdict"
                        );
                        PollState::Failed {
                            submission_id: self.submission_id.clone(),
                            message: GAVE_UP_MESSAGE.to_string(),
                        }
                    }
                }
                Err(err) => {
                    warn!(
                        submission_id = %self.submission_id,
                        attempt,
                        error = %err,
                        "failed to fetch submission"
                    );
                    PollState::Failed {
                        submission_id: self.submission_id.clone(),
                        message: FETCH_FAILED_MESSAGE.to_string(),
                    }
                }
            };

            let finished = next.is_finished();
            if !self.publish(next) {
                debug!(submission_id = %self.submission_id, "discarding stale poll result");
                return;
            }
            if finished {
                return;
            }

            let delay = self.policy.delay(attempt, &mut rand::rng());
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    debug!(submission_id = %self.submission_id, "poll cancelled while waiting");
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Applies `next` unless a newer chain has started. Returns whether it was applied.
    fn publish(&self, next: PollState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != self.my_generation {
                return false;
            }
            *state = next.clone();
            self.events
                .emit(ClientEvent::PollStateChanged { state: next });
            true
        })
    }
}
