//! Blob-style image store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ImageId;
use crate::domain::ports::{ImageRepository, ImageRepositoryError};
use crate::outbound::generate_id;

fn poisoned() -> ImageRepositoryError {
    ImageRepositoryError::connection("image store lock poisoned")
}

/// In-memory implementation of [`ImageRepository`].
#[derive(Debug, Default)]
pub struct InMemoryImageRepository {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryImageRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored images.
    pub fn len(&self) -> Result<usize, ImageRepositoryError> {
        Ok(self.blobs.read().map_err(|_| poisoned())?.len())
    }

    /// Whether no images are stored.
    pub fn is_empty(&self) -> Result<bool, ImageRepositoryError> {
        self.len().map(|count| count == 0)
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn save(&self, bytes: Vec<u8>) -> Result<ImageId, ImageRepositoryError> {
        let id = ImageId::new(generate_id())
            .map_err(|err| ImageRepositoryError::query(format!("generated id rejected: {err}")))?;
        self.blobs
            .write()
            .map_err(|_| poisoned())?
            .insert(id.as_str().to_owned(), bytes);
        Ok(id)
    }

    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Vec<u8>>, ImageRepositoryError> {
        let blobs = self.blobs.read().map_err(|_| poisoned())?;
        Ok(blobs.get(id.as_str()).cloned())
    }

    async fn delete(&self, id: &ImageId) -> Result<(), ImageRepositoryError> {
        self.blobs
            .write()
            .map_err(|_| poisoned())?
            .remove(id.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn stored_bytes_come_back_unchanged() {
        let repo = InMemoryImageRepository::new();
        let id = repo.save(vec![1, 2, 3]).await.expect("save succeeds");

        let found = repo.find_by_id(&id).await.expect("lookup succeeds");
        assert_eq!(found, Some(vec![1, 2, 3]));
    }

    #[rstest]
    #[tokio::test]
    async fn each_save_gets_a_fresh_id() {
        let repo = InMemoryImageRepository::new();
        let first = repo.save(vec![1]).await.expect("save succeeds");
        let second = repo.save(vec![1]).await.expect("save succeeds");
        assert_ne!(first, second);
        assert_eq!(repo.len().expect("len"), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_and_tolerates_unknown_ids() {
        let repo = InMemoryImageRepository::new();
        let id = repo.save(vec![9]).await.expect("save succeeds");

        repo.delete(&id).await.expect("delete succeeds");
        repo.delete(&id).await.expect("second delete succeeds");

        assert!(repo.find_by_id(&id).await.expect("lookup").is_none());
        assert!(repo.is_empty().expect("is_empty"));
    }
}
