//! Review HTTP handlers.
//!
//! ```text
//! GET  /api/v1/reviews?limit=10&offset=0
//! POST /api/v1/reviews
//! PUT  /api/v1/reviews/{id}/rating-window
//! PUT  /api/v1/reviews/{id}/ratings/{contributor}
//! PUT  /api/v1/reviews/{id}/discussed-at
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateReviewRequest, SubmitRatingRequest};
use crate::domain::{DomainError, Film, ImageReference, Rating, Review, ReviewFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_cache_header;
use crate::inbound::http::identity::{Contributor, FILM_ADD_ROLE};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, decode_base64_image, ensure_in_range, missing_field_error, parse_image_id,
    parse_optional_rfc3339_timestamp, parse_review_id, parse_rfc3339_timestamp,
};

/// Largest page a listing may request.
pub const MAX_LIST_LIMIT: u32 = 100;

/// Cover image reference as exchanged over HTTP.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageReferenceBody {
    /// Stored image id; ignored on create when `image` bytes are sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Where the image was obtained.
    #[serde(default)]
    pub source: String,
    /// Copyright holder or licence note.
    #[serde(default)]
    pub copyright: String,
}

/// Film metadata as exchanged over HTTP.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilmBody {
    /// Stored exactly as sent; a blank title is rejected.
    #[schema(example = "Stalker")]
    pub title: String,
    /// Title in the original language.
    #[serde(default)]
    pub original_title: String,
    /// Year of release.
    #[serde(default)]
    pub release_year: u16,
    /// Minimum recommended age.
    #[serde(default)]
    pub age_rating: u8,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime_minutes: u16,
    /// Original language.
    #[serde(default)]
    pub language: String,
    /// Production country.
    #[serde(default)]
    pub country: String,
    /// Director credit.
    #[serde(default)]
    pub director: String,
    /// Cover image reference.
    #[serde(default)]
    pub image: ImageReferenceBody,
}

/// Request payload for creating a review.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequestBody {
    /// The film under review.
    pub film: FilmBody,
    /// Defaults to the authenticated contributor.
    #[serde(default)]
    pub contributed_by: Option<String>,
    /// RFC 3339 discussion date, if already known.
    #[schema(format = "date-time")]
    #[serde(default)]
    pub discussed_at: Option<String>,
    /// Whether the rating window starts open.
    #[serde(default)]
    pub rating_open: bool,
    /// Base64-encoded cover image.
    #[serde(default)]
    pub image: Option<String>,
}

/// Request payload for opening or closing the rating window.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RatingWindowRequestBody {
    /// `true` accepts ratings, `false` rejects them.
    pub open: bool,
}

/// Request payload for submitting a score.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SubmitRatingRequestBody {
    /// Score from 1 to 10.
    #[schema(minimum = 1, maximum = 10, example = 8)]
    pub score: i64,
}

/// Request payload for recording when a film was discussed.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscussedAtRequestBody {
    /// RFC 3339 timestamp; offsets are normalised to UTC.
    #[schema(format = "date-time")]
    pub discussed_at: String,
}

/// Paging parameters for the review listing.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsParams {
    /// Page size, 1 to 100.
    pub limit: Option<u32>,
    /// Rows to skip.
    pub offset: Option<u32>,
}

/// A single rating in a review response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatingBody {
    /// Contributor who rated.
    pub from: String,
    /// Score from 1 to 10.
    pub score: u8,
    /// Abstention marker.
    pub abstained: bool,
}

/// Authoring metadata in a review response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetailsBody {
    /// Contributor who submitted the review.
    pub contributed_by: String,
    /// RFC 3339 discussion date in UTC.
    #[schema(format = "date-time")]
    pub discussed_at: Option<String>,
    /// Whether ratings are accepted.
    pub rating_open: bool,
}

/// Review as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReviewBody {
    /// Storage-assigned identifier.
    pub id: String,
    /// The film under review.
    pub film: FilmBody,
    /// Authoring metadata.
    pub details: ReviewDetailsBody,
    /// Ratings in submission order.
    pub ratings: Vec<RatingBody>,
}

impl From<ImageReference> for ImageReferenceBody {
    fn from(value: ImageReference) -> Self {
        Self {
            id: value.id.map(String::from),
            source: value.source,
            copyright: value.copyright,
        }
    }
}

impl From<Film> for FilmBody {
    fn from(value: Film) -> Self {
        Self {
            title: value.title,
            original_title: value.original_title,
            release_year: value.release_year,
            age_rating: value.age_rating,
            runtime_minutes: value.runtime_minutes,
            language: value.language,
            country: value.country,
            director: value.director,
            image: value.image.into(),
        }
    }
}

impl From<Rating> for RatingBody {
    fn from(value: Rating) -> Self {
        Self {
            from: value.from,
            score: value.score.get(),
            abstained: value.abstained,
        }
    }
}

impl From<Review> for ReviewBody {
    fn from(value: Review) -> Self {
        Self {
            id: value.id.map(String::from).unwrap_or_default(),
            film: value.film.into(),
            details: ReviewDetailsBody {
                contributed_by: value.details.contributed_by,
                discussed_at: value.details.discussed_at.map(|at| at.to_rfc3339()),
                rating_open: value.details.rating_open,
            },
            ratings: value.ratings.into_iter().map(RatingBody::from).collect(),
        }
    }
}

fn parse_film(body: FilmBody) -> Result<Film, DomainError> {
    if body.title.trim().is_empty() {
        return Err(missing_field_error(FieldName::new("film.title")));
    }
    let image_id = body
        .image
        .id
        .as_deref()
        .map(|raw| parse_image_id(raw, FieldName::new("film.image.id")))
        .transpose()?;

    Ok(Film {
        title: body.title,
        original_title: body.original_title,
        release_year: body.release_year,
        age_rating: body.age_rating,
        runtime_minutes: body.runtime_minutes,
        language: body.language,
        country: body.country,
        director: body.director,
        image: ImageReference {
            id: image_id,
            source: body.image.source,
            copyright: body.image.copyright,
        },
    })
}

fn parse_create_request(
    body: CreateReviewRequestBody,
    contributor: Contributor,
) -> Result<CreateReviewRequest, DomainError> {
    let contributed_by = body
        .contributed_by
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| contributor.into_inner());

    Ok(CreateReviewRequest {
        film: parse_film(body.film)?,
        contributed_by,
        discussed_at: parse_optional_rfc3339_timestamp(
            body.discussed_at.as_deref(),
            FieldName::new("discussedAt"),
        )?,
        rating_open: body.rating_open,
        image: body
            .image
            .map(|encoded| decode_base64_image(&encoded, FieldName::new("image")))
            .transpose()?,
    })
}

fn parse_filter(params: &ListReviewsParams, default_limit: u32) -> Result<ReviewFilter, DomainError> {
    let limit = ensure_in_range(
        params.limit.unwrap_or(default_limit),
        1,
        MAX_LIST_LIMIT,
        FieldName::new("limit"),
    )?;
    Ok(ReviewFilter::new(limit, params.offset.unwrap_or(0)))
}

/// List reviews, most recently discussed first.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "Page of reviews", body = [ReviewBody]),
        (status = 400, description = "Invalid paging parameters", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    params: web::Query<ListReviewsParams>,
) -> ApiResult<HttpResponse> {
    let filter = parse_filter(&params, state.settings.default_list_limit)?;
    let reviews = state
        .with_deadline(state.reviews_query.list_reviews(filter))
        .await?;
    let body: Vec<ReviewBody> = reviews.into_iter().map(ReviewBody::from).collect();
    Ok(HttpResponse::Ok()
        .insert_header(no_cache_header())
        .json(body))
}

/// Create a review, optionally uploading its cover image.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewRequestBody,
    responses(
        (status = 201, description = "Review created", body = ReviewBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No contributor identity", body = ErrorSchema),
        (status = 403, description = "Missing film.add role", body = ErrorSchema),
        (status = 413, description = "Payload too large"),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("ForwardedUser" = []))
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    contributor: Contributor,
    payload: web::Json<CreateReviewRequestBody>,
) -> ApiResult<HttpResponse> {
    contributor.require_role(FILM_ADD_ROLE)?;
    let request = parse_create_request(payload.into_inner(), contributor)?;
    let review = state
        .with_deadline(state.reviews.create_review(request))
        .await?;
    Ok(HttpResponse::Created().json(ReviewBody::from(review)))
}

/// Open or close a review's rating window.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/rating-window",
    params(("id" = String, Path, description = "Review id")),
    request_body = RatingWindowRequestBody,
    responses(
        (status = 204, description = "Rating window updated"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "No contributor identity", body = ErrorSchema),
        (status = 403, description = "Missing film.add role", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "setRatingWindow",
    security(("ForwardedUser" = []))
)]
#[put("/reviews/{id}/rating-window")]
pub async fn set_rating_window(
    state: web::Data<HttpState>,
    contributor: Contributor,
    path: web::Path<String>,
    payload: web::Json<RatingWindowRequestBody>,
) -> ApiResult<HttpResponse> {
    contributor.require_role(FILM_ADD_ROLE)?;
    let review_id = parse_review_id(&path, FieldName::new("id"))?;
    state
        .with_deadline(state.reviews.set_rating_open(&review_id, payload.open))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Submit or replace the caller's rating.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/ratings/{contributor}",
    params(
        ("id" = String, Path, description = "Review id"),
        ("contributor" = String, Path, description = "Must match the authenticated contributor")
    ),
    request_body = SubmitRatingRequestBody,
    responses(
        (status = 204, description = "Rating recorded"),
        (status = 400, description = "Score out of range, window closed or foreign contributor", body = ErrorSchema),
        (status = 401, description = "No contributor identity", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "submitRating",
    security(("ForwardedUser" = []))
)]
#[put("/reviews/{id}/ratings/{contributor}")]
pub async fn submit_rating(
    state: web::Data<HttpState>,
    contributor: Contributor,
    path: web::Path<(String, String)>,
    payload: web::Json<SubmitRatingRequestBody>,
) -> ApiResult<HttpResponse> {
    let (raw_id, from) = path.into_inner();
    if from != contributor.as_str() {
        return Err(
            DomainError::invalid_input("ratings can only be submitted for yourself").with_details(
                json!({
                    "field": "contributor",
                    "value": from,
                    "code": "contributor_mismatch",
                }),
            ),
        );
    }
    let review_id = parse_review_id(&raw_id, FieldName::new("id"))?;

    state
        .with_deadline(state.reviews.submit_rating(SubmitRatingRequest {
            review_id,
            from,
            score: payload.score,
        }))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record when the group discussed the film.
#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}/discussed-at",
    params(("id" = String, Path, description = "Review id")),
    request_body = DiscussedAtRequestBody,
    responses(
        (status = 204, description = "Discussion time updated"),
        (status = 400, description = "Invalid timestamp", body = ErrorSchema),
        (status = 401, description = "No contributor identity", body = ErrorSchema),
        (status = 403, description = "Missing film.add role", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "setDiscussedAt",
    security(("ForwardedUser" = []))
)]
#[put("/reviews/{id}/discussed-at")]
pub async fn set_discussed_at(
    state: web::Data<HttpState>,
    contributor: Contributor,
    path: web::Path<String>,
    payload: web::Json<DiscussedAtRequestBody>,
) -> ApiResult<HttpResponse> {
    contributor.require_role(FILM_ADD_ROLE)?;
    let review_id = parse_review_id(&path, FieldName::new("id"))?;
    let discussed_at = parse_rfc3339_timestamp(&payload.discussed_at, FieldName::new("discussedAt"))?;
    state
        .with_deadline(state.reviews.set_discussed_at(&review_id, discussed_at))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
