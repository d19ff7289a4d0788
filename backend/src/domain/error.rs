//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses; see `inbound::http::error` for the status code table.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No authenticated identity is bound to the request.
    NoSession,
    /// A user, language, or code sample does not exist.
    NotFound,
    /// Authenticated, but the caller does not own the resource.
    Forbidden,
    /// A path identifier is not a valid UUID.
    InvalidIdentifier,
    /// One or more input fields failed validation.
    ValidationFailed,
    /// The username is already registered.
    DuplicateIdentity,
    /// Login failed; never says which half of the credential was wrong.
    InvalidCredentials,
    /// The backing store is unreachable.
    ServiceUnavailable,
    /// Any other failure reported by the store or the runtime.
    InternalError,
}

/// Field-scoped `(code, message, location)` triple.
///
/// `location` is a path into the request, for example `["query", "pageSize"]`,
/// `["params", "id"]` or `["body"]`.
///
/// # Examples
/// ```
/// use codelibrary::domain::FieldError;
///
/// let error = FieldError::new("invalidValue", "Invalid page", ["query", "page"]);
/// assert_eq!(error.location(), ["query", "page"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[schema(example = "invalidValue")]
    code: String,
    #[schema(example = "Invalid pageSize")]
    message: String,
    #[schema(example = json!(["query", "pageSize"]))]
    location: Vec<String>,
}

impl FieldError {
    /// Build a field error at the given request location.
    pub fn new<L, S>(code: &str, message: impl Into<String>, location: L) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code: code.to_owned(),
            message: message.into(),
            location: location.into_iter().map(Into::into).collect(),
        }
    }

    /// Machine-readable code such as `invalidValue`.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Path of the offending input.
    pub fn location(&self) -> &[String] {
        self.location.as_slice()
    }
}

/// Error payload shared by services and adapters.
///
/// # Examples
/// ```
/// use codelibrary::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("code sample not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.details()[0].code(), "notFound");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "validation_failed")]
    code: ErrorCode,
    #[schema(example = "Validation failed")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl Error {
    /// Create an error, capturing the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: Vec::new(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Trace identifier captured when the error was built.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Field errors carried by the payload.
    pub fn details(&self) -> &[FieldError] {
        self.details.as_slice()
    }

    /// Attach a trace identifier to the error.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Replace the field errors.
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = details;
        self
    }

    /// Replace the field errors with a single entry.
    pub fn with_field_error(self, detail: FieldError) -> Self {
        self.with_details(vec![detail])
    }

    /// No authenticated session is bound to the request.
    pub fn no_session() -> Self {
        Self::new(ErrorCode::NoSession, "Permission Denied").with_field_error(FieldError::new(
            "permissionDenied",
            "Permission Denied",
            ["body"],
        ))
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message).with_field_error(FieldError::new(
            "notFound",
            "Not found",
            ["path"],
        ))
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Forbidden, message.clone())
            .with_field_error(FieldError::new("forbidden", message, ["body"]))
    }

    /// A path identifier failed to parse as a UUID.
    pub fn invalid_identifier<L, S>(location: L) -> Self
    where
        L: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ErrorCode::InvalidIdentifier, "invalid UUID")
            .with_field_error(FieldError::new("invalidId", "invalid UUID", location))
    }

    /// Aggregate several field failures into one validation error.
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::new(ErrorCode::ValidationFailed, "Validation failed").with_details(details)
    }

    /// The username is already registered.
    pub fn duplicate_identity() -> Self {
        Self::new(ErrorCode::DuplicateIdentity, "User already exists").with_field_error(
            FieldError::new("duplicateUser", "User already exists", ["body"]),
        )
    }

    /// Login failed for any reason touching the credential itself.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, "Invalid user credentials").with_field_error(
            FieldError::new("invalidCredentials", "Invalid user credentials", ["body"]),
        )
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
