use std::fmt;
use std::str::FromStr;

/// Judging status of a submission.
///
/// Wire labels are the human-readable strings the contest backend reports
/// (`"Wrong Answer"`, `"Time Limit Exceeded"`, ...). Any label outside the
/// known set is kept verbatim in [`SubmissionStatus::Unrecognized`] instead of
/// being rejected, so a newer backend cannot break status polling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubmissionStatus {
    Pending,
    Running,
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RuntimeError,
    CompilationError,
    Unrecognized(String),
}

impl SubmissionStatus {
    /// Statuses after which no further judging happens.
    pub const TERMINAL: [SubmissionStatus; 5] = [
        SubmissionStatus::Accepted,
        SubmissionStatus::WrongAnswer,
        SubmissionStatus::TimeLimitExceeded,
        SubmissionStatus::RuntimeError,
        SubmissionStatus::CompilationError,
    ];

    /// Terminal statuses are an allow-list: unrecognized labels are not terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Accepted
                | Self::WrongAnswer
                | Self::TimeLimitExceeded
                | Self::RuntimeError
                | Self::CompilationError
        )
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Accepted => "Accepted",
            Self::WrongAnswer => "Wrong Answer",
            Self::TimeLimitExceeded => "Time Limit Exceeded",
            Self::RuntimeError => "Runtime Error",
            Self::CompilationError => "Compilation Error",
            Self::Unrecognized(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Pending" => Self::Pending,
            "Running" => Self::Running,
            "Accepted" => Self::Accepted,
            "Wrong Answer" => Self::WrongAnswer,
            "Time Limit Exceeded" => Self::TimeLimitExceeded,
            "Runtime Error" => Self::RuntimeError,
            "Compilation Error" => Self::CompilationError,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubmissionStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}
