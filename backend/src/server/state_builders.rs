//! Builders for HTTP state ports.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::warn;

use codelibrary::domain::{CodeSampleService, CredentialService};
use codelibrary::inbound::http::state::HttpState;
use codelibrary::outbound::persistence::{
    DbPool, DieselCodeSampleRepository, DieselLanguageRepository, DieselUserRepository,
};
use codelibrary::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Use `make_state` when a pool is available, otherwise fixture ports.
fn build_state_with_pool<Pool>(
    pool: Option<&Pool>,
    make_state: impl FnOnce(&Pool) -> io::Result<HttpState>,
) -> io::Result<HttpState> {
    match pool {
        Some(pool) => make_state(pool),
        None => {
            warn!("no database configured; serving fixture credentials and an empty catalogue");
            Ok(HttpState::fixtures())
        }
    }
}

fn diesel_state(config: &ServerConfig, pool: &DbPool) -> io::Result<HttpState> {
    let hasher = Argon2PasswordHasher::new(config.hashing)
        .map_err(|err| io::Error::other(format!("invalid Argon2 parameters: {err}")))?;
    let credentials = CredentialService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(hasher),
    );
    let samples = Arc::new(CodeSampleService::new(
        Arc::new(
            DieselCodeSampleRepository::new(pool.clone())
                .with_consistency(config.search_consistency),
        ),
        Arc::new(DieselLanguageRepository::new(pool.clone())),
        Arc::new(DefaultClock),
    ));

    Ok(HttpState::new(
        Arc::new(credentials),
        samples.clone(),
        samples,
    ))
}

/// Build the handler state, wiring Diesel adapters when a pool is configured.
///
/// # Errors
///
/// Returns [`io::Error`] when the Argon2 parameters are rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    build_state_with_pool(config.db_pool.as_ref(), |pool| diesel_state(config, pool))
        .map(web::Data::new)
}
