//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every review, image and health endpoint plus the
//! error schemas. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Adds the gateway identity headers as security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "ForwardedUser",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                crate::inbound::http::identity::CONTRIBUTOR_HEADER,
                "Contributor name set by the authenticating gateway.",
            ))),
        );
        components.add_security_scheme(
            "ForwardedRoles",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                crate::inbound::http::identity::ROLES_HEADER,
                "Comma-separated role claims set by the authenticating gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Filmkritiken API",
        description = "Collaborative film reviews with per-contributor ratings."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::set_rating_window,
        crate::inbound::http::reviews::submit_rating,
        crate::inbound::http::reviews::set_discussed_at,
        crate::inbound::http::images::load_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "reviews", description = "Reviews and their ratings"),
        (name = "images", description = "Stored cover images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;

    use super::*;

    #[rstest]
    #[case("/api/v1/reviews")]
    #[case("/api/v1/reviews/{id}/rating-window")]
    #[case("/api/v1/reviews/{id}/ratings/{contributor}")]
    #[case("/api/v1/reviews/{id}/discussed-at")]
    #[case("/api/v1/images/{id}")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn review_listing_and_creation_share_a_path() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/v1/reviews").expect("reviews path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
    }

    #[test]
    fn forwarded_identity_schemes_are_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("ForwardedUser"));
        assert!(components.security_schemes.contains_key("ForwardedRoles"));
        assert!(components.schemas.contains_key("crate.domain.Error"));
    }
}
