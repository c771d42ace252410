//! Server construction and middleware wiring.

use std::io;
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ReviewService;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::images::load_image;
use crate::inbound::http::reviews::{
    create_review, list_reviews, set_discussed_at, set_rating_window, submit_rating,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{json_config, query_config};
use crate::outbound::memory::{InMemoryImageRepository, InMemoryReviewRepository};
use crate::outbound::persistence::{
    DbPool, DieselImageRepository, DieselReviewRepository, PoolConfig, run_migrations,
};
use crate::settings::ServerSettings;

/// Shared state handed to every worker's `App`.
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness and liveness flags for the health checks.
    pub health_state: web::Data<HealthState>,
    /// Driving ports and handler tunables.
    pub http_state: web::Data<HttpState>,
    /// Largest accepted JSON body, in bytes.
    pub max_payload_bytes: usize,
}

/// Wire the review service over the storage `settings` select.
///
/// With a database URL the schema is migrated and reviews go to PostgreSQL.
/// Without one they are kept in memory and lost on restart.
///
/// # Errors
/// Returns an [`io::Error`] when migrations fail or the pool cannot be built.
pub async fn build_http_state(settings: &ServerSettings) -> io::Result<HttpState> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database URL configured; reviews are kept in memory only");
        return Ok(in_memory_http_state(settings));
    };

    let migration_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied = applied.len(), "database schema up to date");

    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.database_max_connections()),
    )
    .await
    .map_err(io::Error::other)?;
    let service = Arc::new(ReviewService::new(
        Arc::new(DieselReviewRepository::new(pool.clone())),
        Arc::new(DieselImageRepository::new(pool)),
    ));
    Ok(HttpState::new(service.clone(), service).with_settings(settings.http_settings()))
}

/// Wire the review service over the in-memory stores.
#[must_use]
pub fn in_memory_http_state(settings: &ServerSettings) -> HttpState {
    let service = Arc::new(ReviewService::new(
        Arc::new(InMemoryReviewRepository::new()),
        Arc::new(InMemoryImageRepository::new()),
    ));
    HttpState::new(service.clone(), service).with_settings(settings.http_settings())
}

#[cfg(debug_assertions)]
fn api_docs(cfg: &mut web::ServiceConfig) {
    cfg.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
const fn api_docs(_cfg: &mut web::ServiceConfig) {}

/// Assemble the actix application: API scope, health checks and docs.
#[must_use]
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        max_payload_bytes,
    } = deps;

    let api = web::scope("/api/v1")
        .app_data(json_config(max_payload_bytes))
        .app_data(query_config())
        .service(list_reviews)
        .service(create_review)
        .service(set_rating_window)
        .service(submit_rating)
        .service(set_discussed_at)
        .service(load_image);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
        .configure(api_docs)
}

/// Construct an Actix HTTP server from loaded settings.
///
/// Readiness is flagged once storage is wired and the listener is bound.
///
/// # Errors
/// Propagates [`io::Error`] when storage setup or binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
) -> io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(build_http_state(settings).await?),
        max_payload_bytes: settings.max_payload_bytes(),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(settings.bind_addr())?
        .run();

    health_state.mark_ready();
    Ok(server)
}
