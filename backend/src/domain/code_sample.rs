//! Code sample aggregate, submissions, and search values.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Language, LanguageId, User};

/// Stable code sample identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeSampleId(Uuid);

impl CodeSampleId {
    /// Parse an identifier from its string form.
    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier for a new sample.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CodeSampleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when sample timestamps are out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("modified timestamp {modified} precedes created timestamp {created}")]
pub struct TimestampOrderError {
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Fields a user supplies when creating or editing a sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSampleDraft {
    /// Requested language code, resolved through the language registry.
    pub language_id: String,
    /// Title; carries the highest search weight.
    pub title: String,
    /// Description; second search weight.
    pub description: String,
    /// Source text; lowest search weight.
    pub body: String,
}

/// Whether a submission creates a sample or edits an existing one.
///
/// Only `Update` carries a target, so id parsing is only reachable there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionTarget {
    /// Create a new sample with a fresh id.
    Create,
    /// Overwrite the sample with this id.
    Update {
        /// Identifier parsed from the request path.
        target_id: CodeSampleId,
    },
}

/// A stored code sample joined with its owner and language.
///
/// ## Invariants
/// - `submitted_by` and `created` never change after creation.
/// - `modified >= created`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeSample {
    #[schema(value_type = String, format = Uuid)]
    id: CodeSampleId,
    submitted_by: User,
    language: Language,
    title: String,
    description: String,
    body: String,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Parameter object for [`CodeSample::new`].
#[derive(Debug, Clone)]
pub struct CodeSampleParts {
    /// Sample identifier.
    pub id: CodeSampleId,
    /// Owning user.
    pub submitted_by: User,
    /// Resolved language.
    pub language: Language,
    /// Title text.
    pub title: String,
    /// Description text.
    pub description: String,
    /// Source text.
    pub body: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
    /// Last modification timestamp.
    pub modified: DateTime<Utc>,
}

impl CodeSample {
    /// Assemble a sample, enforcing `modified >= created`.
    pub fn new(parts: CodeSampleParts) -> Result<Self, TimestampOrderError> {
        let CodeSampleParts {
            id,
            submitted_by,
            language,
            title,
            description,
            body,
            created,
            modified,
        } = parts;
        if modified < created {
            return Err(TimestampOrderError { created, modified });
        }
        Ok(Self {
            id,
            submitted_by,
            language,
            title,
            description,
            body,
            created,
            modified,
        })
    }

    /// Sample identifier.
    pub fn id(&self) -> &CodeSampleId {
        &self.id
    }

    /// Owner of the sample.
    pub fn submitted_by(&self) -> &User {
        &self.submitted_by
    }

    /// Language the sample is tagged with.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Title text.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Description text.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Source text.
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Creation timestamp.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Last modification timestamp.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Apply an edit by the owner, keeping identity, owner and `created`.
    ///
    /// `now` earlier than `created` (clock skew) is clamped to `created`.
    pub fn revise(self, language: Language, draft: CodeSampleDraft, now: DateTime<Utc>) -> Self {
        let CodeSampleDraft {
            title,
            description,
            body,
            ..
        } = draft;
        let modified = now.max(self.created);
        Self {
            language,
            title,
            description,
            body,
            modified,
            ..self
        }
    }
}

/// Validated search over code samples.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
///
/// use codelibrary::domain::{CodeSampleSearch, LanguageId};
/// use pagination::PageRequest;
///
/// let languages = BTreeSet::from([LanguageId::new("rust").unwrap()]);
/// let search = CodeSampleSearch::new("borrow checker", languages, PageRequest::default());
/// assert_eq!(search.query(), "borrow checker");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSampleSearch {
    query: String,
    languages: BTreeSet<LanguageId>,
    page: PageRequest,
}

impl CodeSampleSearch {
    /// Build a search value from already validated parts.
    pub fn new(query: impl Into<String>, languages: BTreeSet<LanguageId>, page: PageRequest) -> Self {
        Self {
            query: query.into(),
            languages,
            page,
        }
    }

    /// Web-search style text query.
    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    /// Language filter; empty means every language.
    pub fn languages(&self) -> &BTreeSet<LanguageId> {
        &self.languages
    }

    /// Requested page window.
    pub fn page(&self) -> &PageRequest {
        &self.page
    }
}

/// One page of search results.
pub type CodeSamplePage = Page<CodeSample>;
