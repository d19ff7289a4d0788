//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health probes, and
//! the domain types they exchange. The document backs Swagger UI in debug
//! builds and is exported by `cargo run --bin openapi-dump`.

use crate::domain::{CodeSample, Error, ErrorCode, FieldError, Language, User};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::code_samples::{CodeSamplePageSchema, CodeSampleSubmission};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "user_id",
                "Encrypted session cookie issued by POST /api/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Code library API",
        description = "Search, submit, and curate code samples with session-authenticated writes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::register,
        crate::inbound::http::code_samples::list_code_samples,
        crate::inbound::http::code_samples::create_code_sample,
        crate::inbound::http::code_samples::get_code_sample,
        crate::inbound::http::code_samples::update_code_sample,
        crate::inbound::http::code_samples::delete_code_sample,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Language,
        CodeSample,
        CodeSamplePageSchema,
        CodeSampleSubmission,
        LoginRequest,
        RegisterRequest,
        Error,
        ErrorCode,
        FieldError
    )),
    tags(
        (name = "auth", description = "Login, logout, and registration"),
        (name = "code", description = "Code sample search and curation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
