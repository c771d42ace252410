//! Driving port for review reads.

use async_trait::async_trait;

use crate::domain::{DomainError, ImageId, Review, ReviewFilter};

/// Driving port for review read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// One page of reviews, newest discussion first.
    async fn list_reviews(&self, filter: ReviewFilter) -> Result<Vec<Review>, DomainError>;

    /// Raw bytes of a stored image.
    async fn load_image(&self, image_id: &ImageId) -> Result<Vec<u8>, DomainError>;
}
