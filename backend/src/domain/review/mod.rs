//! Review aggregate: a film write-up plus the group's ratings.
//!
//! A review owns its rating list. Ratings change only through
//! [`Review::record_rating`], which enforces the rating window and keeps at
//! most one entry per contributor. The window itself is a two-state machine
//! ([`RatingWindow`]) flipped unconditionally by [`Review::set_rating_open`].

mod film;
mod ids;
mod rating;

pub use film::{Film, ImageReference};
pub use ids::{IdValidationError, ImageId, ReviewId};
pub use rating::{MAX_SCORE, MIN_SCORE, Rating, RatingScore, RatingScoreError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authoring metadata for a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetails {
    /// Free-text name of whoever submitted the review.
    pub contributed_by: String,
    /// When the group watched or discussed the film.
    #[serde(default)]
    pub discussed_at: Option<DateTime<Utc>>,
    /// Whether new ratings are accepted.
    #[serde(default)]
    pub rating_open: bool,
}

/// State of a review's rating window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingWindow {
    /// Ratings are accepted.
    Open,
    /// Ratings are rejected.
    Closed,
}

impl From<bool> for RatingWindow {
    fn from(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }
}

/// Raised when a rating is submitted while the window is closed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rating for {title} is no longer possible")]
pub struct RatingWindowClosedError {
    /// Title of the film whose window is closed.
    pub title: String,
}

/// How [`Review::record_rating`] changed the rating list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingOutcome {
    /// The contributor rated for the first time.
    Added,
    /// An existing rating was overwritten.
    Updated,
}

/// A single film write-up, the unit of persistence.
///
/// ## Invariants
/// - `id` is `None` until storage has persisted the review.
/// - No two entries in `ratings` share the same `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Storage-assigned identifier.
    #[serde(default)]
    pub id: Option<ReviewId>,
    /// The film under review.
    pub film: Film,
    /// Authoring metadata and rating gate.
    pub details: ReviewDetails,
    /// Ratings in submission order.
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl Review {
    /// Start an unpersisted review with no ratings.
    ///
    /// # Examples
    /// ```
    /// use filmkritiken::domain::{Film, RatingWindow, Review, ReviewDetails};
    ///
    /// let review = Review::new(
    ///     Film::titled("Heat"),
    ///     ReviewDetails {
    ///         contributed_by: "alice".to_owned(),
    ///         discussed_at: None,
    ///         rating_open: true,
    ///     },
    /// );
    /// assert!(review.id.is_none());
    /// assert!(review.ratings.is_empty());
    /// assert_eq!(review.rating_window(), RatingWindow::Open);
    /// ```
    #[must_use]
    pub const fn new(film: Film, details: ReviewDetails) -> Self {
        Self {
            id: None,
            film,
            details,
            ratings: Vec::new(),
        }
    }

    /// Current state of the rating window.
    #[must_use]
    pub fn rating_window(&self) -> RatingWindow {
        RatingWindow::from(self.details.rating_open)
    }

    /// Open or close the rating window.
    pub const fn set_rating_open(&mut self, open: bool) {
        self.details.rating_open = open;
    }

    /// Look up the rating submitted by `from`.
    #[must_use]
    pub fn rating_from(&self, from: &str) -> Option<&Rating> {
        self.ratings.iter().find(|rating| rating.from == from)
    }

    /// Record `score` for `from`, overwriting any earlier rating in place.
    ///
    /// Overwriting also clears `abstained`.
    ///
    /// # Errors
    /// Returns [`RatingWindowClosedError`] when the window is closed; the
    /// rating list is left untouched in that case.
    pub fn record_rating(
        &mut self,
        from: &str,
        score: RatingScore,
    ) -> Result<RatingOutcome, RatingWindowClosedError> {
        if self.rating_window() == RatingWindow::Closed {
            return Err(RatingWindowClosedError {
                title: self.film.title.clone(),
            });
        }

        for rating in &mut self.ratings {
            if rating.from == from {
                rating.score = score;
                rating.abstained = false;
                return Ok(RatingOutcome::Updated);
            }
        }

        self.ratings.push(Rating::new(from, score));
        Ok(RatingOutcome::Added)
    }
}

/// Listing window over reviews.
///
/// Storage returns rows ordered by `discussed_at` descending. Where reviews
/// without a discussion date land is up to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewFilter {
    /// Maximum number of rows.
    pub limit: u32,
    /// Rows to skip before the first returned row.
    pub offset: u32,
}

impl ReviewFilter {
    /// Build a filter from a limit and offset.
    #[must_use]
    pub const fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}
