//! Programming language reference data.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum length of a language code.
pub const LANGUAGE_ID_MAX: usize = 64;

static LANGUAGE_ID_RE: OnceLock<Regex> = OnceLock::new();

fn language_id_regex() -> &'static Regex {
    LANGUAGE_ID_RE.get_or_init(|| {
        // Codes such as `python`, `c++`, `c#` or `objective-c`.
        let pattern = r"^[a-z0-9][a-z0-9+#._-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("language id regex failed to compile: {error}"))
    })
}

/// Validation errors returned by [`LanguageId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageValidationError {
    Empty,
    TooLong { max: usize },
    InvalidCharacters,
}

impl fmt::Display for LanguageValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "language id must not be empty"),
            Self::TooLong { max } => write!(f, "language id must be at most {max} characters"),
            Self::InvalidCharacters => write!(
                f,
                "language id may only contain lowercase letters, digits, and + # . _ -",
            ),
        }
    }
}

impl std::error::Error for LanguageValidationError {}

/// Stable language code, e.g. `python`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageId(String);

impl LanguageId {
    /// Validate and construct a [`LanguageId`].
    pub fn new(id: impl Into<String>) -> Result<Self, LanguageValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(LanguageValidationError::Empty);
        }
        if id.chars().count() > LANGUAGE_ID_MAX {
            return Err(LanguageValidationError::TooLong {
                max: LANGUAGE_ID_MAX,
            });
        }
        if !language_id_regex().is_match(&id) {
            return Err(LanguageValidationError::InvalidCharacters);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for LanguageId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LanguageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<LanguageId> for String {
    fn from(value: LanguageId) -> Self {
        value.0
    }
}

impl TryFrom<String> for LanguageId {
    type Error = LanguageValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Language code paired with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    #[schema(value_type = String, example = "python")]
    id: LanguageId,
    #[schema(example = "Python")]
    name: String,
}

impl Language {
    /// Build a language entry.
    pub fn new(id: LanguageId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Stable code.
    pub fn id(&self) -> &LanguageId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
