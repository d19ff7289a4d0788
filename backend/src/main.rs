//! Backend entry-point: loads configuration, applies migrations, and serves
//! the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use codelibrary::inbound::http::health::HealthState;
use codelibrary::inbound::http::session_config::fingerprint::key_fingerprint;
use codelibrary::inbound::http::session_config::{BuildMode, session_settings_from_env};
use codelibrary::outbound::persistence::{
    DbPool, SearchConsistency, run_migrations,
};
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session key loaded"
    );

    let consistency = if settings.search_snapshot {
        SearchConsistency::Snapshot
    } else {
        SearchConsistency::Relaxed
    };
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    )
    .with_search_consistency(consistency)
    .with_hashing_params(settings.hashing_params());

    if let Some(database_url) = settings.database_url() {
        let url = database_url.to_owned();
        let applied = tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .wrap_err("migration task panicked")??;
        info!(applied, "database schema up to date");

        let pool = DbPool::connect(settings.pool_config(database_url)).await?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(addr = %settings.bind_addr(), "starting server");
    create_server(health_state, config)?.await?;
    Ok(())
}
