use std::fmt;
use std::str::FromStr;

use super::{DomainError, Username};

// Ids are opaque strings handed out by the backend ("1", "42", "alice_coder").
// The only invariant enforced locally is that they are not blank.
macro_rules! define_id_type {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();

                if trimmed.is_empty() {
                    return Err(DomainError::EmptyIdentifier($label));
                }

                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.into_inner()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

define_id_type!(ContestId, "contest id");
define_id_type!(ProblemId, "problem id");
define_id_type!(SubmissionId, "submission id");
define_id_type!(TestCaseId, "test case id");
define_id_type!(UserId, "user id");

impl From<&Username> for UserId {
    fn from(value: &Username) -> Self {
        Self(value.as_str().to_string())
    }
}
