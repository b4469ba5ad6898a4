//! Backend entry-point: loads configuration, applies migrations and serves the
//! REST API, the chat socket and the OpenAPI docs.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::inbound::http::health::HealthState;
use helpdesk::inbound::http::session_config::{BuildMode, session_settings_from_env};
use helpdesk::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{AppSettings, ServerConfig, create_server};

fn config_error(error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(error.to_string())
}

async fn connect_database(database_url: &str) -> std::io::Result<DbPool> {
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(config_error)?;
    info!(applied, "database schema up to date");
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(config_error)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(config_error)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(config_error)?;
    let staff = settings.staff_directory();
    if staff.is_empty() {
        warn!("HELPDESK_STAFF_EMAILS is empty; nobody can open the admin queue");
    }

    let mut config = ServerConfig::new(session, settings.bind_addr().map_err(config_error)?, staff)
        .with_display_clock(settings.display_clock().map_err(config_error)?)
        .with_allowed_origins(settings.allowed_origins())
        .with_identity(settings.identity_backend().map_err(config_error)?);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_database(database_url).await?);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::build_prometheus());

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "helpdesk listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
