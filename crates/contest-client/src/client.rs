use std::sync::Arc;

use shodh_core::domain::SessionContext;
use tracing::info;

use crate::api::{ApiSubmissionSource, ContestApi, HttpContestApi, MockContestApi};
use crate::config::{ApiKind, ClientConfig};
use crate::error::{ClientError, Result};
use crate::events::{ClientEvent, EventBroadcaster, EventStream};
use crate::poller::{PollPolicy, SubmissionPoller};
use crate::session::ContestSession;

/// Entry point: owns the backend, the event bus and the polling policy.
pub struct ContestClient {
    config: Arc<ClientConfig>,
    api: Arc<dyn ContestApi>,
    event_broadcaster: Arc<EventBroadcaster>,
}

impl ContestClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let api: Arc<dyn ContestApi> = match config.api.kind {
            ApiKind::Mock => Arc::new(MockContestApi::from_config(&config.mock)?),
            ApiKind::Http => {
                let base_url = config.api.base_url.as_deref().ok_or_else(|| {
                    ClientError::Config("api.base_url is required for the http backend".to_string())
                })?;
                Arc::new(HttpContestApi::new(base_url, config.api.request_timeout())?)
            }
        };

        Ok(Self::with_api(config, api))
    }

    /// Builds a client around an existing backend.
    pub fn with_api(config: ClientConfig, api: Arc<dyn ContestApi>) -> Self {
        info!(
            backend = api.name(),
            event_buffer_size = config.event_buffer_size,
            poll_interval_ms = config.polling.interval_ms,
            "initializing contest client"
        );

        let event_broadcaster = Arc::new(EventBroadcaster::new(config.event_buffer_size));
        Self {
            config: Arc::new(config),
            api,
            event_broadcaster,
        }
    }

    pub fn api(&self) -> Arc<dyn ContestApi> {
        Arc::clone(&self.api)
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.config.polling.policy()
    }

    pub fn subscribe_events(&self) -> EventStream {
        self.event_broadcaster.subscribe()
    }

    /// A standalone status poller backed by this client's API.
    pub fn submission_poller(&self) -> SubmissionPoller {
        SubmissionPoller::new(
            Arc::new(ApiSubmissionSource::new(self.api())),
            self.poll_policy(),
            Arc::clone(&self.event_broadcaster),
        )
    }

    /// Joins a contest. Both values are trimmed and must not be empty.
    pub fn join(&self, contest_id: &str, username: &str) -> Result<ContestSession> {
        let context = SessionContext::join(contest_id, username)?;

        info!(
            contest_id = %context.contest_id(),
            username = %context.username().as_str(),
            "joining contest"
        );
        self.event_broadcaster.emit(ClientEvent::SessionJoined {
            contest_id: context.contest_id().clone(),
            username: context.username().as_str().to_string(),
        });

        Ok(ContestSession::new(
            self.api(),
            context,
            Arc::clone(&self.event_broadcaster),
            self.submission_poller(),
            self.config.leaderboard.refresh_interval(),
        ))
    }
}
