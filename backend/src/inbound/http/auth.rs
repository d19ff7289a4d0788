//! Authentication handlers.
//!
//! ```text
//! POST /api/auth/login {"username":"alice","password":"longenough1"}
//! POST /api/auth/logout
//! POST /api/auth/register {"username":"alice","password":"longenough1","confirmPassword":"longenough1"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Error, ErrorCode, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    #[schema(example = "password")]
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

/// Authenticate and bind the user to the session cookie.
///
/// Blank fields and oversized passwords are rejected before the credential
/// store is consulted, with the same payload as a failed login.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = User,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 403, description = "Invalid credentials", body = Error),
        (status = 422, description = "Malformed body", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<User>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&username, &password).map_err(|err| {
        debug!(reason = %err, "login rejected before lookup");
        Error::invalid_credentials()
    })?;
    let user = state
        .credentials
        .get_user_with_credentials(&credentials)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::NotFound => Error::invalid_credentials(),
            _ => err,
        })?;
    session.save_user(&user)?;
    info!(user_id = %user.id(), "user logged in");
    Ok(web::Json(user))
}

/// Clear the user from the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.delete_user();
    HttpResponse::NoContent().finish()
}

/// Register a new user.
///
/// Does not log the new user in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered user", body = User),
        (status = 403, description = "Username already taken", body = Error),
        (status = 422, description = "Invalid fields", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<User>> {
    let RegisterRequest {
        username,
        password,
        confirm_password,
    } = payload.into_inner();
    let registration = Registration::try_from_parts(&username, &password, &confirm_password)
        .map_err(Error::validation)?;
    let user = state.credentials.register_user(&registration).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
