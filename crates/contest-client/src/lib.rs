pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod leaderboard;
pub mod poller;
pub mod session;

pub use api::{ApiSubmissionSource, ContestApi, HttpContestApi, MockContestApi, SubmissionSource};
pub use client::ContestClient;
pub use config::{ApiKind, ClientConfig, PollingConfig};
pub use error::{ClientError, Result};
pub use events::{ClientEvent, EventBroadcaster, EventStream};
pub use leaderboard::{LeaderboardSnapshot, LeaderboardWatcher};
pub use poller::{PollPolicy, PollState, SubmissionPoller};
pub use session::ContestSession;
