//! Document-style review store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize as _;
use serde_json::Value;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{Review, ReviewFilter, ReviewId};
use crate::outbound::generate_id;

fn poisoned() -> ReviewRepositoryError {
    ReviewRepositoryError::connection("review store lock poisoned")
}

fn encode(review: &Review) -> Result<Value, ReviewRepositoryError> {
    serde_json::to_value(review)
        .map_err(|err| ReviewRepositoryError::serialization(format!("encode review: {err}")))
}

fn decode(document: &Value) -> Result<Review, ReviewRepositoryError> {
    Review::deserialize(document)
        .map_err(|err| ReviewRepositoryError::serialization(format!("decode review: {err}")))
}

/// Newest discussion first; undated reviews last.
fn by_discussed_at_desc(a: &Review, b: &Review) -> Ordering {
    match (a.details.discussed_at, b.details.discussed_at) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// In-memory implementation of [`ReviewRepository`].
///
/// Each review is stored as the JSON document its serde form produces, keyed
/// by id, so partial updates touch a single field the way a document database
/// would.
#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    documents: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryReviewRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let documents = self.documents.read().map_err(|_| poisoned())?;
        documents.get(id.as_str()).map(decode).transpose()
    }

    async fn list(&self, filter: &ReviewFilter) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut reviews = {
            let documents = self.documents.read().map_err(|_| poisoned())?;
            documents
                .values()
                .map(decode)
                .collect::<Result<Vec<_>, _>>()?
        };
        reviews.sort_by(by_discussed_at_desc);

        let offset = usize::try_from(filter.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit).unwrap_or(usize::MAX);
        Ok(reviews.into_iter().skip(offset).take(limit).collect())
    }

    async fn save(&self, mut review: Review) -> Result<Review, ReviewRepositoryError> {
        let id = match review.id.clone() {
            Some(id) => id,
            None => {
                let id = ReviewId::new(generate_id()).map_err(|err| {
                    ReviewRepositoryError::query(format!("generated id rejected: {err}"))
                })?;
                review.id = Some(id.clone());
                id
            }
        };
        let document = encode(&review)?;

        self.documents
            .write()
            .map_err(|_| poisoned())?
            .insert(id.into(), document);
        Ok(review)
    }

    async fn update_discussed_at(
        &self,
        id: &ReviewId,
        discussed_at: DateTime<Utc>,
    ) -> Result<u64, ReviewRepositoryError> {
        let timestamp = serde_json::to_value(discussed_at).map_err(|err| {
            ReviewRepositoryError::serialization(format!("encode discussedAt: {err}"))
        })?;

        let mut documents = self.documents.write().map_err(|_| poisoned())?;
        let Some(document) = documents.get_mut(id.as_str()) else {
            return Ok(0);
        };
        let details = document
            .get_mut("details")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                ReviewRepositoryError::serialization(format!("review {id} has no details"))
            })?;
        details.insert("discussedAt".to_owned(), timestamp);
        Ok(1)
    }
}
