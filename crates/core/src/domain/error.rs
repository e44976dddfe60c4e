use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid score: {0}. score must be in [0, 100]")]
    InvalidScore(u16),
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username is too long: {0} characters (max {max})", max = super::Username::MAX_LEN)]
    UsernameTooLong(usize),
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}
