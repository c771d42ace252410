//! Port for binary image storage.

use async_trait::async_trait;

use crate::domain::ImageId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image repository adapters.
    pub enum ImageRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "image repository connection failed: {message}",
        /// A read or write failed during execution.
        Query { message: String } =>
            "image repository query failed: {message}",
    }
}

/// Port for storing opaque image bytes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Store `bytes` and return the new identifier.
    async fn save(&self, bytes: Vec<u8>) -> Result<ImageId, ImageRepositoryError>;

    /// Fetch stored bytes, or `None` when nothing has that id.
    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Vec<u8>>, ImageRepositoryError>;

    /// Remove an image. Unknown ids are not an error.
    async fn delete(&self, id: &ImageId) -> Result<(), ImageRepositoryError>;
}
