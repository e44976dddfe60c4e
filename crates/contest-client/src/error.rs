use shodh_core::domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("contest has not been loaded yet")]
    ContestNotLoaded,

    #[error("no problem selected")]
    NoProblemSelected,

    #[error("problem not found: {0}")]
    ProblemNotFound(String),

    #[error("source code must not be empty")]
    EmptySourceCode,

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
