//! Port for the read-only language registry.

use async_trait::async_trait;

use crate::domain::{Language, LanguageId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by language repository adapters.
    pub enum LanguageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "language repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "language repository query failed: {message}",
    }
}

/// Driven port resolving language codes to display metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageRepository: Send + Sync {
    /// Look up a language by code.
    async fn find_by_id(&self, id: &LanguageId)
    -> Result<Option<Language>, LanguageRepositoryError>;
}

/// In-memory registry seeded with a handful of common languages.
#[derive(Debug, Clone)]
pub struct FixtureLanguageRepository {
    languages: Vec<Language>,
}

impl FixtureLanguageRepository {
    /// Build a registry over the given languages.
    pub fn new(languages: Vec<Language>) -> Self {
        Self { languages }
    }
}

impl Default for FixtureLanguageRepository {
    fn default() -> Self {
        let languages = [
            ("go", "Go"),
            ("javascript", "JavaScript"),
            ("python", "Python"),
            ("rust", "Rust"),
            ("typescript", "TypeScript"),
        ]
        .into_iter()
        .filter_map(|(id, name)| LanguageId::new(id).ok().map(|id| Language::new(id, name)))
        .collect();
        Self::new(languages)
    }
}

#[async_trait]
impl LanguageRepository for FixtureLanguageRepository {
    async fn find_by_id(
        &self,
        id: &LanguageId,
    ) -> Result<Option<Language>, LanguageRepositoryError> {
        Ok(self
            .languages
            .iter()
            .find(|language| language.id() == id)
            .cloned())
    }
}
