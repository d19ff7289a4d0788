//! Authentication primitives: login credentials, registration, and hashes.
//!
//! Constructors validate raw strings before a handler reaches a port, so
//! oversized passwords never reach the hashing primitive.

use std::fmt;

use zeroize::Zeroizing;

use super::{FieldError, UserValidationError, Username};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 64;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Password exceeds [`PASSWORD_MAX`].
    PasswordTooLong,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong => {
                write!(f, "password must be at most {PASSWORD_MAX} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the credential store.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and at most [`PASSWORD_MAX`] characters. It keeps
///   caller-provided whitespace and is zeroised on drop.
///
/// # Examples
/// ```
/// use codelibrary::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "longenough1").unwrap();
/// assert_eq!(creds.username(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.chars().count() > PASSWORD_MAX {
            return Err(LoginValidationError::PasswordTooLong);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plaintext password accepted for registration.
///
/// Zeroised on drop; `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Opaque stored password hash.
///
/// Only the hashing capability interprets the contents; callers compare
/// through `PasswordHasher::verify`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read from storage or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form suitable for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use codelibrary::domain::Registration;
///
/// let registration =
///     Registration::try_from_parts("alice", "longenough1", "longenough1").unwrap();
/// assert_eq!(registration.username().as_ref(), "alice");
///
/// let errors = Registration::try_from_parts("", "short", "other").unwrap_err();
/// assert_eq!(errors.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Password,
}

impl Registration {
    /// Validate a registration, collecting every field failure.
    ///
    /// # Errors
    ///
    /// Returns all applicable field errors: `passwordMismatch`, `badPassword`
    /// and `badUsername`.
    pub fn try_from_parts(
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();

        if password != confirm_password {
            errors.push(FieldError::new(
                "passwordMismatch",
                "Passwords do not match",
                ["body", "confirmPassword"],
            ));
        }

        let length = password.chars().count();
        if length < PASSWORD_MIN {
            errors.push(FieldError::new(
                "badPassword",
                "Password too short",
                ["body", "password"],
            ));
        } else if length > PASSWORD_MAX {
            errors.push(FieldError::new(
                "badPassword",
                "Password too long",
                ["body", "password"],
            ));
        }

        let username = match Username::new(username) {
            Ok(username) => Some(username),
            Err(error) => {
                let message = match error {
                    UserValidationError::UsernameTooLong { .. } => "Username too long",
                    _ => "Username must not be empty",
                };
                errors.push(FieldError::new(
                    "badUsername",
                    message,
                    ["body", "username"],
                ));
                None
            }
        };

        match username {
            Some(username) if errors.is_empty() => Ok(Self {
                username,
                password: Password(Zeroizing::new(password.to_owned())),
            }),
            _ => Err(errors),
        }
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password to hash.
    pub fn password(&self) -> &Password {
        &self.password
    }
}
