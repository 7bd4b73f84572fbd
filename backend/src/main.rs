//! Backend entry-point: loads settings, wires storage and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use helpdesk::inbound::http::error::expose_internal_details;
use helpdesk::inbound::http::health::HealthState;
use helpdesk::outbound::persistence::{DbPool, PoolConfig};
use server::{ServerConfig, ServerSettings, create_server};

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

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    expose_internal_details(settings.expose_error_details);

    let mut config = ServerConfig::new(
        settings.bind_addr()?,
        settings.jwt_secret()?,
        settings.token_ttl()?,
        settings.service_options(),
    );

    if let Some(url) = settings.database_url.as_deref() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        pool.check()
            .await
            .map_err(|e| std::io::Error::other(format!("database unreachable: {e}")))?;
        info!("database connection verified");
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
