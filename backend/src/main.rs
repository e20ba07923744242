//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::outbound::persistence::{DbPool, PoolConfig, migrate};
use marketplace::outbound::security::{BuildMode, token_settings_from_env};
use marketplace::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Build the pool and apply migrations when a database is configured.
async fn prepare_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url.clone() else {
        return Ok(None);
    };
    if settings.run_migrations {
        let applied = migrate(database_url.clone())
            .await
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        info!(applied, "database migrations complete");
    }
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(Some(pool))
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

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(format!("invalid bind address: {err}")))?;

    let tokens = token_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(
        fingerprint = %tokens.fingerprint(),
        expiry_secs = tokens.expiry().num_seconds(),
        "token settings loaded"
    );

    let mut config = ServerConfig::new(bind_addr, tokens);
    if let Some(pool) = prepare_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
