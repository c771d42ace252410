//! Individual ratings and their score bounds.

use serde::{Deserialize, Serialize};

/// Lowest accepted score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted score.
pub const MAX_SCORE: u8 = 10;

/// Raised when a score falls outside `MIN_SCORE..=MAX_SCORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score must be between 1 and 10")]
pub struct RatingScoreError {
    /// The rejected input.
    pub value: i64,
}

/// A validated score in the inclusive range 1 to 10.
///
/// # Examples
/// ```
/// use filmkritiken::domain::RatingScore;
///
/// assert_eq!(RatingScore::try_from(7_i64).map(RatingScore::get), Ok(7));
/// assert!(RatingScore::try_from(0_i64).is_err());
/// assert!(RatingScore::try_from(11_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct RatingScore(u8);

impl RatingScore {
    /// The score as a plain integer.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingScore {
    type Error = RatingScoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
            .map(Self)
            .ok_or(RatingScoreError { value })
    }
}

impl From<RatingScore> for u8 {
    fn from(value: RatingScore) -> Self {
        value.0
    }
}

/// One contributor's rating of a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Contributor who submitted the rating; unique within a review.
    pub from: String,
    /// Submitted score.
    pub score: RatingScore,
    /// Abstention marker. Nothing sets it yet; every write resets it.
    #[serde(default)]
    pub abstained: bool,
}

impl Rating {
    /// A fresh, non-abstaining rating.
    #[must_use]
    pub fn new(from: impl Into<String>, score: RatingScore) -> Self {
        Self {
            from: from.into(),
            score,
            abstained: false,
        }
    }
}
