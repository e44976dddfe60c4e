use anyhow::Result;
use shodh_core::domain::{ContestId, ProblemId, SubmissionId};
use tokio::sync::broadcast;

use crate::poller::PollState;

/// 客户端对外广播的事件类型。
#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// 用户加入比赛。
    SessionJoined {
        /// 比赛 ID。
        contest_id: ContestId,
        /// 参赛用户名。
        username: String,
    },
    /// 比赛详情加载完成。
    ContestLoaded {
        /// 比赛 ID。
        contest_id: ContestId,
        /// 题目数量。
        problem_count: usize,
    },
    /// 代码提交成功，后端已分配提交 ID。
    SubmissionCreated {
        /// 提交 ID。
        submission_id: SubmissionId,
        /// 题目 ID。
        problem_id: ProblemId,
    },
    /// 提交状态轮询器的状态变化。
    PollStateChanged {
        /// 变化后的状态。
        state: PollState,
    },
    /// 排行榜刷新完成。
    LeaderboardUpdated {
        /// 比赛 ID。
        contest_id: ContestId,
        /// 排行榜条目数。
        entries: usize,
    },
}

/// 基于 `tokio::broadcast` 的事件广播器。
#[derive(Debug, Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<ClientEvent>,
}

impl EventBroadcaster {
    /// 创建事件广播器。
    ///
    /// `capacity` 表示内部广播队列容量。
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 广播一个事件，没有订阅者时直接丢弃。
    pub fn emit(&self, event: ClientEvent) {
        let _ = self.sender.send(event);
    }

    /// 订阅事件流。
    pub fn subscribe(&self) -> EventStream {
        EventStream {
            receiver: self.sender.subscribe(),
        }
    }
}

/// 事件接收流包装器。
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<ClientEvent>,
}

impl EventStream {
    /// 异步接收下一条事件。
    pub async fn recv(&mut self) -> Result<ClientEvent> {
        Ok(self.receiver.recv().await?)
    }

    /// 等待下一条轮询状态变化，跳过其他事件。
    pub async fn next_poll_state(&mut self) -> Result<PollState> {
        loop {
            if let ClientEvent::PollStateChanged { state } = self.recv().await? {
                return Ok(state);
            }
        }
    }

    /// 非阻塞尝试接收一条事件。
    pub fn try_recv(&mut self) -> Result<ClientEvent> {
        Ok(self.receiver.try_recv()?)
    }
}
