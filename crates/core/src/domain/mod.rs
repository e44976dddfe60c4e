mod contest;
mod difficulty;
mod error;
mod ids;
mod language;
mod leaderboard;
mod score;
mod session;
mod submission;
mod submission_status;

pub use contest::{Contest, Problem, TestCase};
pub use difficulty::Difficulty;
pub use error::DomainError;
pub use ids::{ContestId, ProblemId, SubmissionId, TestCaseId, UserId};
pub use language::Language;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use score::Score;
pub use session::{SessionContext, Username};
pub use submission::{Submission, SubmissionRequest};
pub use submission_status::SubmissionStatus;
