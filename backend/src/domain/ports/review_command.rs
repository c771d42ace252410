//! Driving port for review mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DomainError, Film, Review, ReviewId};

/// Request to create a review, optionally together with its cover image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReviewRequest {
    /// Film metadata. Any `image.id` is replaced when `image` is supplied.
    pub film: Film,
    /// Free-text name of the submitter.
    pub contributed_by: String,
    /// When the group discussed the film, if already known.
    pub discussed_at: Option<DateTime<Utc>>,
    /// Whether the rating window starts open.
    pub rating_open: bool,
    /// Raw cover image bytes.
    pub image: Option<Vec<u8>>,
}

/// Request to record one contributor's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRatingRequest {
    /// Review being rated.
    pub review_id: ReviewId,
    /// Contributor name; at most one rating per name is kept.
    pub from: String,
    /// Unvalidated score as received from the caller.
    pub score: i64,
}

/// Driving port for review write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Persist a new review with an empty rating list.
    ///
    /// When image bytes are supplied they are stored first. If the review
    /// save then fails the image is deleted again and the save error is
    /// returned.
    async fn create_review(&self, request: CreateReviewRequest) -> Result<Review, DomainError>;

    /// Open or close the rating window. Idempotent.
    async fn set_rating_open(&self, review_id: &ReviewId, open: bool) -> Result<(), DomainError>;

    /// Add or overwrite the caller's rating while the window is open.
    async fn submit_rating(&self, request: SubmitRatingRequest) -> Result<(), DomainError>;

    /// Replace the discussion timestamp without touching other fields.
    async fn set_discussed_at(
        &self,
        review_id: &ReviewId,
        discussed_at: DateTime<Utc>,
    ) -> Result<(), DomainError>;
}
