use super::{ContestId, DomainError, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub const MAX_LEN: usize = 64;
    pub const ANONYMOUS: &'static str = "anonymous";

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(DomainError::EmptyUsername);
        }

        let len = trimmed.chars().count();
        if len > Self::MAX_LEN {
            return Err(DomainError::UsernameTooLong(len));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Who is taking part in which contest.
///
/// Built once when joining and passed explicitly to everything that acts on
/// the contestant's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    contest_id: ContestId,
    username: Username,
}

impl SessionContext {
    pub fn new(contest_id: ContestId, username: Username) -> Self {
        Self {
            contest_id,
            username,
        }
    }

    pub fn join(contest_id: &str, username: &str) -> Result<Self, DomainError> {
        Ok(Self::new(ContestId::new(contest_id)?, Username::new(username)?))
    }

    pub fn contest_id(&self) -> &ContestId {
        &self.contest_id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// The contestant's user id, which is the username itself.
    pub fn user_id(&self) -> UserId {
        UserId::from(&self.username)
    }
}
