//! Image HTTP handler.
//!
//! ```text
//! GET /api/v1/images/{id}
//! ```

use actix_web::{HttpResponse, get, web};

use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::immutable_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_image_id};

/// Guess a media type from well-known magic numbers.
const fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xff, 0xd8, 0xff, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Serve a stored cover image.
///
/// Images never change once stored, so responses are cacheable by any
/// intermediary for the configured lifetime.
#[utoipa::path(
    get,
    path = "/api/v1/images/{id}",
    params(("id" = String, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown image", body = ErrorSchema),
        (status = 500, description = "Storage failure", body = ErrorSchema),
        (status = 503, description = "Timed out", body = ErrorSchema)
    ),
    tags = ["images"],
    operation_id = "loadImage",
    security([])
)]
#[get("/images/{id}")]
pub async fn load_image(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let image_id = parse_image_id(&path, FieldName::new("id"))?;
    let bytes = state
        .with_deadline(state.reviews_query.load_image(&image_id))
        .await?;
    Ok(HttpResponse::Ok()
        .content_type(sniff_content_type(&bytes))
        .insert_header(immutable_header(state.settings.image_cache_max_age_secs))
        .body(bytes))
}
