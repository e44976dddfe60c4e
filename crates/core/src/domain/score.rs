use std::fmt;
use std::ops::RangeInclusive;

use super::DomainError;

/// Points a judged submission earned, out of [`Score::MAX`].
///
/// Pending and running submissions carry [`Score::ZERO`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Score(u16);

impl Score {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 100;
    pub const ZERO: Score = Score(Self::MIN);
    const RANGE: RangeInclusive<u16> = Self::MIN..=Self::MAX;

    pub fn new(points: u16) -> Result<Self, DomainError> {
        Self::RANGE
            .contains(&points)
            .then_some(Self(points))
            .ok_or(DomainError::InvalidScore(points))
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

impl TryFrom<u16> for Score {
    type Error = DomainError;

    fn try_from(points: u16) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Score> for u32 {
    fn from(score: Score) -> Self {
        u32::from(score.0)
    }
}
