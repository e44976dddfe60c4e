use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::ClientError;
use crate::poller::PollPolicy;

type Result<T> = anyhow::Result<T>;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl ClientConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("failed to deserialize client config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ClientError> {
        if self.api.kind == ApiKind::Http && self.api.base_url.is_none() {
            return Err(ClientError::Config(
                "api.base_url is required when api.kind = \"http\"".to_string(),
            ));
        }
        if self.event_buffer_size == 0 {
            return Err(ClientError::Config(
                "event_buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.leaderboard.refresh_interval_ms == 0 {
            return Err(ClientError::Config(
                "leaderboard.refresh_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mock.submission_failure_rate) {
            return Err(ClientError::Config(format!(
                "mock.submission_failure_rate must be in [0, 1], got {}",
                self.mock.submission_failure_rate
            )));
        }
        self.polling.validate()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            mock: MockConfig::default(),
            polling: PollingConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKind {
    #[default]
    Mock,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default)]
    pub kind: ApiKind,
    pub base_url: Option<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            kind: ApiKind::default(),
            base_url: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Latency and randomness of the in-memory backend.
#[derive(Debug, Deserialize, Clone)]
pub struct MockConfig {
    pub seed: Option<u64>,
    #[serde(default = "default_contest_delay_ms")]
    pub contest_delay_ms: u64,
    #[serde(default = "default_leaderboard_delay_ms")]
    pub leaderboard_delay_ms: u64,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_submission_delay_ms")]
    pub submission_delay_ms: u64,
    #[serde(default)]
    pub submission_failure_rate: f64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            seed: None,
            contest_delay_ms: default_contest_delay_ms(),
            leaderboard_delay_ms: default_leaderboard_delay_ms(),
            submit_delay_ms: default_submit_delay_ms(),
            submission_delay_ms: default_submission_delay_ms(),
            submission_failure_rate: 0.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
    #[serde(default)]
    pub jitter: f64,
    pub max_attempts: Option<u32>,
    pub max_elapsed_ms: Option<u64>,
}

impl PollingConfig {
    pub fn validate(&self) -> std::result::Result<(), ClientError> {
        if self.interval_ms == 0 {
            return Err(ClientError::Config(
                "polling.interval_ms must be greater than zero".to_string(),
            ));
        }
        if !(self.backoff_multiplier >= 1.0 && self.backoff_multiplier.is_finite()) {
            return Err(ClientError::Config(format!(
                "polling.backoff_multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        if !(0.0..1.0).contains(&self.jitter) {
            return Err(ClientError::Config(format!(
                "polling.jitter must be in [0, 1), got {}",
                self.jitter
            )));
        }
        if self.max_attempts == Some(0) {
            return Err(ClientError::Config(
                "polling.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.interval_ms),
            backoff_multiplier: self.backoff_multiplier,
            max_interval: Duration::from_millis(self.max_interval_ms),
            jitter: self.jitter,
            max_attempts: self.max_attempts,
            max_elapsed: self.max_elapsed_ms.map(Duration::from_millis),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_interval_ms: default_max_interval_ms(),
            jitter: 0.0,
            max_attempts: None,
            max_elapsed_ms: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaderboardConfig {
    #[serde(default = "default_leaderboard_refresh_ms")]
    pub refresh_interval_ms: u64,
}

impl LeaderboardConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_leaderboard_refresh_ms(),
        }
    }
}

fn default_event_buffer_size() -> usize {
    256
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_contest_delay_ms() -> u64 {
    500
}

fn default_leaderboard_delay_ms() -> u64 {
    300
}

fn default_submit_delay_ms() -> u64 {
    200
}

fn default_submission_delay_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_interval_ms() -> u64 {
    30_000
}

fn default_leaderboard_refresh_ms() -> u64 {
    15_000
}
