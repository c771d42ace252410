//! Port for review persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Review, ReviewFilter, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "review repository connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "review repository query failed: {message}",
        /// A stored row could not be mapped to or from the domain model.
        Serialization { message: String } =>
            "review repository serialization failed: {message}",
    }
}

/// Port for loading and storing reviews.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Fetch one review, or `None` when no row has that id.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Fetch a page of reviews ordered by `discussed_at` descending.
    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Insert or replace a whole review.
    ///
    /// Reviews without an id are inserted and returned with the id storage
    /// assigned. Reviews with an id replace the stored row.
    async fn save(&self, review: Review) -> Result<Review, ReviewRepositoryError>;

    /// Overwrite only `discussed_at` on one review.
    ///
    /// Returns the number of rows matched; zero means the id is unknown.
    async fn update_discussed_at(
        &self,
        id: &ReviewId,
        discussed_at: DateTime<Utc>,
    ) -> Result<u64, ReviewRepositoryError>;
}
