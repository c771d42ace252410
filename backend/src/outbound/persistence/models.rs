//! Diesel row structs. Internal to the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{images, reviews};

/// A stored review as read back from `reviews`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: String,
    pub film: Value,
    pub contributed_by: String,
    pub discussed_at: Option<DateTime<Utc>>,
    pub rating_open: bool,
    pub ratings: Value,
}

/// Full review row for inserts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow {
    pub id: String,
    pub film: Value,
    pub contributed_by: String,
    pub discussed_at: Option<DateTime<Utc>>,
    pub rating_open: bool,
    pub ratings: Value,
}

/// Every column but the key, for the conflict branch of an upsert.
///
/// `None` clears `discussed_at` rather than leaving it untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = reviews)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReviewUpdate<'a> {
    pub film: &'a Value,
    pub contributed_by: &'a str,
    pub discussed_at: Option<DateTime<Utc>>,
    pub rating_open: bool,
    pub ratings: &'a Value,
}

impl<'a> From<&'a NewReviewRow> for ReviewUpdate<'a> {
    fn from(row: &'a NewReviewRow) -> Self {
        Self {
            film: &row.film,
            contributed_by: &row.contributed_by,
            discussed_at: row.discussed_at,
            rating_open: row.rating_open,
            ratings: &row.ratings,
        }
    }
}

/// Insertable image blob.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = images)]
pub(crate) struct NewImageRow<'a> {
    pub id: &'a str,
    pub bytes: &'a [u8],
}
