//! Backend entry-point: loads settings, selects capability strategies and
//! serves the API.

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ireal_backend::inbound::http::health::HealthState;
use ireal_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use ireal_backend::outbound::persistence::{DbPool, PoolConfig};
use ireal_backend::server::{AppSettings, ServerConfig, build_http_state, create_server};

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

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let config = settings
        .into_config()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let pool = match config.database_url.as_deref() {
        Some(url) => Some(
            DbPool::connect(PoolConfig::new(url))
                .await
                .map_err(|e| std::io::Error::other(e.to_string()))?,
        ),
        None => None,
    };

    let bind_addr = config.bind_addr;
    let http_state =
        build_http_state(config, pool).map_err(|e| std::io::Error::other(e.to_string()))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        web::Data::new(http_state),
        ServerConfig::new(session, bind_addr),
    )?;
    info!(%bind_addr, "listening");
    server.await
}
