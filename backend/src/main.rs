//! Backend entry-point: loads settings, connects storage and serves the
//! puzzle REST API.

mod server;

use actix_web::cookie::SameSite;
use actix_web::web;
use color_eyre::eyre::WrapErr;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use games_backend::inbound::http::health::HealthState;
use games_backend::outbound::persistence::DbPool;
use games_backend::settings::{BuildMode, GamesSettings};
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GamesSettings::load().wrap_err("failed to load configuration")?;
    let mode = BuildMode::from_debug_assertions();
    let key = settings.session_key(mode)?;
    let same_site = match mode {
        BuildMode::Debug => SameSite::Lax,
        BuildMode::Release => SameSite::Strict,
    };

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure,
        same_site,
        settings.bind_addr()?,
        settings.asset_root(),
    );
    match settings.pool_config() {
        Some(pool_config) => {
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("failed to build database pool")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("GAMES_DATABASE_URL not set; using fixture data"),
    }

    let bind_addr = settings.bind_addr()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
