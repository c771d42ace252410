//! PostgreSQL-backed `ImageRepository` storing cover images as `BYTEA`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ImageId;
use crate::domain::ports::{ImageRepository, ImageRepositoryError};
use crate::outbound::generate_id;

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::NewImageRow;
use super::pool::{DbPool, PoolError};
use super::schema::images;

/// Diesel implementation of [`ImageRepository`].
#[derive(Clone)]
pub struct DieselImageRepository {
    pool: DbPool,
}

impl DieselImageRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ImageRepositoryError {
    map_pool_error(error, ImageRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ImageRepositoryError {
    map_diesel_error(
        error,
        ImageRepositoryError::query,
        ImageRepositoryError::connection,
    )
}

#[async_trait]
impl ImageRepository for DieselImageRepository {
    async fn save(&self, bytes: Vec<u8>) -> Result<ImageId, ImageRepositoryError> {
        let id = ImageId::new(generate_id())
            .map_err(|err| ImageRepositoryError::query(format!("generated id rejected: {err}")))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(images::table)
            .values(NewImageRow {
                id: id.as_str(),
                bytes: &bytes,
            })
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(id)
    }

    async fn find_by_id(&self, id: &ImageId) -> Result<Option<Vec<u8>>, ImageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        images::table
            .filter(images::id.eq(id.as_str()))
            .select(images::bytes)
            .first::<Vec<u8>>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)
    }

    async fn delete(&self, id: &ImageId) -> Result<(), ImageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::delete(images::table.filter(images::id.eq(id.as_str())))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }
}
