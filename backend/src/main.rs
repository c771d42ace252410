//! Backend entry-point: loads settings, installs logging and runs the server.

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use filmkritiken::inbound::http::health::HealthState;
use filmkritiken::server::create_server;
use filmkritiken::settings::ServerSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    info!(addr = %settings.bind_addr(), "starting filmkritiken");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, &settings).await?.await
}
