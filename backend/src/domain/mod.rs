//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! layers, plus the services implementing the driving ports. Types validate
//! on construction and document their invariants in Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` / `FieldError`: transport-agnostic failure payload.
//! - `User`, `Registration`, `LoginCredentials`: identity and credentials.
//! - `Language`, `CodeSample`, `CodeSampleSearch`: the snippet catalogue.
//! - `CredentialService`, `CodeSampleService`: driving port implementations.

pub mod auth;
pub mod code_sample;
mod code_sample_service;
mod credential_service;
pub mod error;
pub mod language;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, Password, PasswordHash,
    Registration,
};
pub use self::code_sample::{
    CodeSample, CodeSampleDraft, CodeSampleId, CodeSamplePage, CodeSampleParts, CodeSampleSearch,
    SubmissionTarget, TimestampOrderError,
};
pub use self::code_sample_service::CodeSampleService;
pub use self::credential_service::CredentialService;
pub use self::error::{Error, ErrorCode, FieldError};
pub use self::language::{LANGUAGE_ID_MAX, Language, LanguageId, LanguageValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use codelibrary::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Not your code sample"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
