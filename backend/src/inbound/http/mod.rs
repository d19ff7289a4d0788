//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod code_samples;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler on a scope or app.
///
/// Callers mount this under `/api` and supply [`state::HttpState`] plus a
/// session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register)
        .service(code_samples::list_code_samples)
        .service(code_samples::create_code_sample)
        .service(code_samples::get_code_sample)
        .service(code_samples::update_code_sample)
        .service(code_samples::delete_code_sample);
}
