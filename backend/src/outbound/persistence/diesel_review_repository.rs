//! PostgreSQL-backed `ReviewRepository`.
//!
//! Film metadata and ratings round-trip as JSON columns; `discussed_at` and
//! `rating_open` are plain columns so listing and partial updates stay in SQL.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{Film, Rating, Review, ReviewDetails, ReviewFilter, ReviewId};
use crate::outbound::generate_id;

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewReviewRow, ReviewRow, ReviewUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel implementation of [`ReviewRepository`].
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReviewRepositoryError {
    map_pool_error(error, ReviewRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn encode_row(id: &ReviewId, review: &Review) -> Result<NewReviewRow, ReviewRepositoryError> {
    let film = serde_json::to_value(&review.film)
        .map_err(|err| ReviewRepositoryError::serialization(format!("encode film: {err}")))?;
    let ratings = serde_json::to_value(&review.ratings)
        .map_err(|err| ReviewRepositoryError::serialization(format!("encode ratings: {err}")))?;

    Ok(NewReviewRow {
        id: id.as_str().to_owned(),
        film,
        contributed_by: review.details.contributed_by.clone(),
        discussed_at: review.details.discussed_at,
        rating_open: review.details.rating_open,
        ratings,
    })
}

/// Rebuild a domain review, rejecting rows that no longer satisfy its rules.
fn decode_row(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let ReviewRow {
        id,
        film,
        contributed_by,
        discussed_at,
        rating_open,
        ratings,
    } = row;

    let review_id = ReviewId::new(id)
        .map_err(|err| ReviewRepositoryError::serialization(format!("decode id: {err}")))?;
    let decoded_film: Film = serde_json::from_value(film).map_err(|err| {
        ReviewRepositoryError::serialization(format!("decode film of {review_id}: {err}"))
    })?;
    let decoded_ratings: Vec<Rating> = serde_json::from_value(ratings).map_err(|err| {
        ReviewRepositoryError::serialization(format!("decode ratings of {review_id}: {err}"))
    })?;

    Ok(Review {
        id: Some(review_id),
        film: decoded_film,
        details: ReviewDetails {
            contributed_by,
            discussed_at,
            rating_open,
        },
        ratings: decoded_ratings,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row: Option<ReviewRow> = reviews::table
            .filter(reviews::id.eq(id.as_str()))
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(decode_row).transpose()
    }

    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let rows: Vec<ReviewRow> = reviews::table
            .order((reviews::discussed_at.desc().nulls_last(), reviews::id.asc()))
            .limit(i64::from(filter.limit))
            .offset(i64::from(filter.offset))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        rows.into_iter().map(decode_row).collect()
    }

    async fn save(&self, mut review: Review) -> Result<Review, ReviewRepositoryError> {
        let id = if let Some(existing) = &review.id {
            existing.clone()
        } else {
            ReviewId::new(generate_id()).map_err(|err| {
                ReviewRepositoryError::query(format!("generated id rejected: {err}"))
            })?
        };
        let row = encode_row(&id, &review)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::insert_into(reviews::table)
            .values(&row)
            .on_conflict(reviews::id)
            .do_update()
            .set(ReviewUpdate::from(&row))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        review.id = Some(id);
        Ok(review)
    }

    async fn update_discussed_at(
        &self,
        id: &ReviewId,
        discussed_at: DateTime<Utc>,
    ) -> Result<u64, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let matched = diesel::update(reviews::table.filter(reviews::id.eq(id.as_str())))
            .set(reviews::discussed_at.eq(Some(discussed_at)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        u64::try_from(matched)
            .map_err(|err| ReviewRepositoryError::query(format!("matched row count: {err}")))
    }
}
