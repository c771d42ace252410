//! Review domain service.
//!
//! `ReviewService` implements both driving ports over the two storage ports.
//! It holds no state of its own: every call re-reads from storage.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreateReviewRequest, ImageRepository, ImageRepositoryError, ReviewCommand, ReviewQuery,
    ReviewRepository, ReviewRepositoryError, SubmitRatingRequest,
};
use crate::domain::{
    DomainError, ImageId, RatingOutcome, RatingScore, Review, ReviewDetails, ReviewFilter, ReviewId,
};

fn map_review_repository_error(error: ReviewRepositoryError) -> DomainError {
    match error {
        ReviewRepositoryError::Connection { message } => {
            DomainError::storage(format!("review store unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            DomainError::storage(format!("review store error: {message}"))
        }
        ReviewRepositoryError::Serialization { message } => {
            DomainError::storage(format!("review store returned malformed data: {message}"))
        }
    }
}

fn map_image_repository_error(error: ImageRepositoryError) -> DomainError {
    match error {
        ImageRepositoryError::Connection { message } => {
            DomainError::storage(format!("image store unavailable: {message}"))
        }
        ImageRepositoryError::Query { message } => {
            DomainError::storage(format!("image store error: {message}"))
        }
    }
}

/// Review service implementing [`ReviewCommand`] and [`ReviewQuery`].
pub struct ReviewService<R, I> {
    reviews: Arc<R>,
    images: Arc<I>,
}

impl<R, I> Clone for ReviewService<R, I> {
    fn clone(&self) -> Self {
        Self {
            reviews: Arc::clone(&self.reviews),
            images: Arc::clone(&self.images),
        }
    }
}

impl<R, I> ReviewService<R, I> {
    /// Create a service over the given review and image stores.
    #[must_use]
    pub const fn new(reviews: Arc<R>, images: Arc<I>) -> Self {
        Self { reviews, images }
    }
}

impl<R, I> ReviewService<R, I>
where
    R: ReviewRepository,
    I: ImageRepository,
{
    async fn fetch(&self, review_id: &ReviewId) -> Result<Review, DomainError> {
        self.reviews
            .find_by_id(review_id)
            .await
            .map_err(map_review_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("review {review_id} not found")))
    }

    async fn persist(&self, review: Review) -> Result<Review, DomainError> {
        self.reviews
            .save(review)
            .await
            .map_err(map_review_repository_error)
    }

    /// Best-effort removal of an image whose review never got saved.
    async fn discard_image(&self, image_id: &ImageId) {
        if let Err(err) = self.images.delete(image_id).await {
            warn!(image_id = %image_id, error = %err, "failed to delete orphaned image");
        }
    }
}

#[async_trait]
impl<R, I> ReviewCommand for ReviewService<R, I>
where
    R: ReviewRepository,
    I: ImageRepository,
{
    async fn create_review(&self, request: CreateReviewRequest) -> Result<Review, DomainError> {
        let CreateReviewRequest {
            mut film,
            contributed_by,
            discussed_at,
            rating_open,
            image,
        } = request;

        let stored_image = match image {
            Some(bytes) => {
                let image_id = self
                    .images
                    .save(bytes)
                    .await
                    .map_err(map_image_repository_error)?;
                film.image.id = Some(image_id.clone());
                Some(image_id)
            }
            None => None,
        };

        let review = Review::new(
            film,
            ReviewDetails {
                contributed_by,
                discussed_at,
                rating_open,
            },
        );

        match self.persist(review).await {
            Ok(saved) => {
                info!(
                    review_id = saved.id.as_ref().map(ReviewId::as_str),
                    title = %saved.film.title,
                    "review created"
                );
                Ok(saved)
            }
            Err(err) => {
                if let Some(image_id) = stored_image {
                    self.discard_image(&image_id).await;
                }
                Err(err)
            }
        }
    }

    async fn set_rating_open(&self, review_id: &ReviewId, open: bool) -> Result<(), DomainError> {
        let mut review = self.fetch(review_id).await?;
        review.set_rating_open(open);
        self.persist(review).await?;
        info!(review_id = %review_id, open, "rating window updated");
        Ok(())
    }

    async fn submit_rating(&self, request: SubmitRatingRequest) -> Result<(), DomainError> {
        let score = RatingScore::try_from(request.score)
            .map_err(|err| DomainError::invalid_input(err.to_string()))?;

        let mut review = self.fetch(&request.review_id).await?;
        let outcome = review
            .record_rating(&request.from, score)
            .map_err(|err| DomainError::invalid_input(err.to_string()))?;
        self.persist(review).await?;

        debug!(
            review_id = %request.review_id,
            from = %request.from,
            score = score.get(),
            updated = outcome == RatingOutcome::Updated,
            "rating recorded"
        );
        Ok(())
    }

    async fn set_discussed_at(
        &self,
        review_id: &ReviewId,
        discussed_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let matched = self
            .reviews
            .update_discussed_at(review_id, discussed_at)
            .await
            .map_err(map_review_repository_error)?;
        if matched == 0 {
            return Err(DomainError::not_found(format!("review {review_id} not found")));
        }
        Ok(())
    }
}

#[async_trait]
impl<R, I> ReviewQuery for ReviewService<R, I>
where
    R: ReviewRepository,
    I: ImageRepository,
{
    async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, DomainError> {
        self.reviews
            .list(&filter)
            .await
            .map_err(map_review_repository_error)
    }

    async fn load_image(&self, image_id: &ImageId) -> Result<Vec<u8>, DomainError> {
        self.images
            .find_by_id(image_id)
            .await
            .map_err(map_image_repository_error)?
            .ok_or_else(|| DomainError::not_found(format!("image {image_id} not found")))
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
