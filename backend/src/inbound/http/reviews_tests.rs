//! Tests for review HTTP handlers.

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockReviewCommand, MockReviewQuery};
use crate::domain::{ImageId, RatingScore, ReviewDetails, ReviewId};
use crate::inbound::http::identity::{CONTRIBUTOR_HEADER, FILM_ADD_ROLE, ROLES_HEADER};
use crate::inbound::http::state::HttpSettings;
use crate::inbound::http::validation::{json_config, query_config};

fn test_app(
    command: MockReviewCommand,
    query: MockReviewQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(command), Arc::new(query));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config(1024))
        .app_data(query_config())
        .service(
            web::scope("/api/v1")
                .service(list_reviews)
                .service(create_review)
                .service(set_rating_window)
                .service(submit_rating)
                .service(set_discussed_at),
        )
}

fn sample_review() -> Review {
    let mut review = Review::new(
        Film::titled("Stalker"),
        ReviewDetails {
            contributed_by: "alice".to_owned(),
            discussed_at: Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).single(),
            rating_open: true,
        },
    );
    review.id = Some(ReviewId::new("r1").expect("valid id"));
    review.film.image.id = Some(ImageId::new("img1").expect("valid id"));
    review.ratings.push(Rating::new(
        "bob",
        RatingScore::try_from(8_i64).expect("valid score"),
    ));
    review
}

#[actix_web::test]
async fn list_uses_default_paging_and_serialises_reviews() {
    let mut query = MockReviewQuery::new();
    query
        .expect_list_reviews()
        .withf(|filter| *filter == ReviewFilter::new(10, 0))
        .times(1)
        .return_once(|_| Ok(vec![sample_review()]));

    let app = actix_test::init_service(test_app(MockReviewCommand::new(), query)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/reviews")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("Cache-Control")
            .and_then(|v| v.to_str().ok()),
        Some("no-cache")
    );
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body[0]["id"], json!("r1"));
    assert_eq!(body[0]["film"]["title"], json!("Stalker"));
    assert_eq!(body[0]["film"]["image"]["id"], json!("img1"));
    assert_eq!(body[0]["details"]["contributedBy"], json!("alice"));
    assert_eq!(
        body[0]["details"]["discussedAt"],
        json!("2024-03-01T20:00:00+00:00")
    );
    assert_eq!(
        body[0]["ratings"],
        json!([{"from": "bob", "score": 8, "abstained": false}])
    );
}

#[actix_web::test]
async fn list_passes_explicit_paging() {
    let mut query = MockReviewQuery::new();
    query
        .expect_list_reviews()
        .withf(|filter| *filter == ReviewFilter::new(25, 50))
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let app = actix_test::init_service(test_app(MockReviewCommand::new(), query)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/reviews?limit=25&offset=50")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/v1/reviews?limit=0")]
#[case("/api/v1/reviews?limit=101")]
#[case("/api/v1/reviews?limit=ten")]
#[case("/api/v1/reviews?offset=-1")]
#[actix_web::test]
async fn list_rejects_bad_paging(#[case] uri: &str) {
    let mut query = MockReviewQuery::new();
    query.expect_list_reviews().times(0);

    let app = actix_test::init_service(test_app(MockReviewCommand::new(), query)).await;
    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_input"));
}

#[actix_web::test]
async fn create_decodes_image_and_keeps_title_as_sent() {
    let mut command = MockReviewCommand::new();
    command
        .expect_create_review()
        .withf(|request| {
            request.film.title == "  Stalker "
                && request.contributed_by == "carol"
                && request.rating_open
                && request.image.as_deref() == Some(&[0x89_u8, 0x50, 0x4e, 0x47][..])
                && request.discussed_at.is_none()
        })
        .times(1)
        .return_once(|_| Ok(sample_review()));

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header((CONTRIBUTOR_HEADER, "carol"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({
                "film": {"title": "  Stalker "},
                "ratingOpen": true,
                "image": "iVBORw=="
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], json!("r1"));
}

#[actix_web::test]
async fn create_requires_a_contributor() {
    let mut command = MockReviewCommand::new();
    command.expect_create_review().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .set_json(json!({"film": {"title": "Stalker"}}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::no_roles(None)]
#[case::other_role(Some("film.rate"))]
#[case::near_miss(Some("film.add.extra"))]
#[actix_web::test]
async fn create_requires_the_film_add_role(#[case] roles: Option<&str>) {
    let mut command = MockReviewCommand::new();
    command.expect_create_review().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let mut req = actix_test::TestRequest::post()
        .uri("/api/v1/reviews")
        .insert_header((CONTRIBUTOR_HEADER, "alice"))
        .set_json(json!({"film": {"title": "Stalker"}}));
    if let Some(value) = roles {
        req = req.insert_header((ROLES_HEADER, value));
    }
    let res = actix_test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("forbidden"));
    assert_eq!(body["details"]["role"], json!("film.add"));
}

#[rstest]
#[case::rating_window("/api/v1/reviews/r1/rating-window", json!({"open": false}))]
#[case::discussed_at(
    "/api/v1/reviews/r1/discussed-at",
    json!({"discussedAt": "2024-05-04T20:30:00Z"})
)]
#[actix_web::test]
async fn curation_without_the_role_is_forbidden(#[case] uri: &str, #[case] payload: Value) {
    let mut command = MockReviewCommand::new();
    command.expect_set_rating_open().times(0);
    command.expect_set_discussed_at().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(uri)
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, "film.rate"))
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[case::spaces("   ")]
#[case::empty("")]
#[case::tabs_and_newlines("\t\n")]
#[actix_web::test]
async fn create_rejects_blank_titles(#[case] title: &str) {
    let mut command = MockReviewCommand::new();
    command.expect_create_review().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"film": {"title": title}}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], json!("film.title"));
}

#[rstest]
#[case(json!({"film": {"title": "   "}}), "film.title")]
#[case(json!({"film": {"title": "Heat"}, "discussedAt": "last week"}), "discussedAt")]
#[case(json!({"film": {"title": "Heat"}, "image": "***"}), "image")]
#[actix_web::test]
async fn create_rejects_invalid_fields(#[case] payload: Value, #[case] field: &str) {
    let mut command = MockReviewCommand::new();
    command.expect_create_review().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], json!(field));
}

#[actix_web::test]
async fn create_rejects_malformed_json_with_domain_payload() {
    let app = actix_test::init_service(test_app(
        MockReviewCommand::new(),
        MockReviewQuery::new(),
    ))
    .await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"film": 3}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("invalid_input"));
}

#[actix_web::test]
async fn oversized_bodies_are_rejected() {
    let app = actix_test::init_service(test_app(
        MockReviewCommand::new(),
        MockReviewQuery::new(),
    ))
    .await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/reviews")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"film": {"title": "Heat"}, "image": "A".repeat(4096)}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[rstest]
#[case(true)]
#[case(false)]
#[actix_web::test]
async fn rating_window_is_forwarded(#[case] open: bool) {
    let mut command = MockReviewCommand::new();
    command
        .expect_set_rating_open()
        .withf(move |id, requested| id.as_str() == "r1" && *requested == open)
        .times(1)
        .return_once(|_, _| Ok(()));

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/r1/rating-window")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"open": open}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn rating_window_on_unknown_review_is_404() {
    let mut command = MockReviewCommand::new();
    command
        .expect_set_rating_open()
        .times(1)
        .return_once(|_, _| Err(DomainError::not_found("review missing not found")));

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/missing/rating-window")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"open": false}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rating_is_submitted_for_the_caller() {
    let mut command = MockReviewCommand::new();
    command
        .expect_submit_rating()
        .withf(|request| {
            request.review_id.as_str() == "r1" && request.from == "bob" && request.score == 11
        })
        .times(1)
        .return_once(|_| Err(DomainError::invalid_input("score must be between 1 and 10")));

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/r1/ratings/bob")
            .insert_header((CONTRIBUTOR_HEADER, "bob"))
            .set_json(json!({"score": 11}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], json!("score must be between 1 and 10"));
}

#[actix_web::test]
async fn rating_for_someone_else_is_rejected() {
    let mut command = MockReviewCommand::new();
    command.expect_submit_rating().times(0);

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/r1/ratings/bob")
            .insert_header((CONTRIBUTOR_HEADER, "mallory"))
            .set_json(json!({"score": 10}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], json!("contributor_mismatch"));
}

#[actix_web::test]
async fn discussed_at_is_parsed_and_forwarded() {
    let expected = Utc
        .with_ymd_and_hms(2024, 5, 4, 18, 30, 0)
        .single()
        .expect("valid timestamp");
    let mut command = MockReviewCommand::new();
    command
        .expect_set_discussed_at()
        .withf(move |id, at| id.as_str() == "r1" && *at == expected)
        .times(1)
        .return_once(|_, _| Ok(()));

    let app = actix_test::init_service(test_app(command, MockReviewQuery::new())).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/r1/discussed-at")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"discussedAt": "2024-05-04T20:30:00+02:00"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn storage_failures_are_redacted() {
    let mut query = MockReviewQuery::new();
    query
        .expect_list_reviews()
        .times(1)
        .return_once(|_| Err(DomainError::storage("review store unavailable: 10.0.0.7 refused")));

    let app = actix_test::init_service(test_app(MockReviewCommand::new(), query)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/reviews")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("storage"));
    assert_eq!(body["message"], json!("Storage unavailable"));
}

/// Command port whose calls never finish in time.
struct StalledCommands;

#[async_trait::async_trait]
impl crate::domain::ports::ReviewCommand for StalledCommands {
    async fn create_review(&self, _request: CreateReviewRequest) -> Result<Review, DomainError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Err(DomainError::internal("unreachable"))
    }

    async fn set_rating_open(&self, _review_id: &ReviewId, _open: bool) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }

    async fn submit_rating(&self, _request: SubmitRatingRequest) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }

    async fn set_discussed_at(
        &self,
        _review_id: &ReviewId,
        _discussed_at: chrono::DateTime<Utc>,
    ) -> Result<(), DomainError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(())
    }
}

#[actix_web::test]
async fn slow_service_calls_answer_503() {
    let state = HttpState::new(Arc::new(StalledCommands), Arc::new(MockReviewQuery::new()))
        .with_settings(HttpSettings {
            request_timeout: Duration::from_millis(20),
            ..HttpSettings::default()
        });
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(set_rating_window)),
    )
    .await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/reviews/r1/rating-window")
            .insert_header((CONTRIBUTOR_HEADER, "alice"))
            .insert_header((ROLES_HEADER, FILM_ADD_ROLE))
            .set_json(json!({"open": true}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], json!("timeout"));
}
