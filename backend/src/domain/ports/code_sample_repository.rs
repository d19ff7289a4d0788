//! Port for code sample persistence and full-text search.

use async_trait::async_trait;

use crate::domain::{CodeSample, CodeSampleId, CodeSamplePage, CodeSampleSearch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by code sample repository adapters.
    pub enum CodeSampleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "code sample repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "code sample repository query failed: {message}",
    }
}

/// Driven port over the `code_samples` table.
///
/// Writes recompute the weighted search index in the same statement as the
/// visible fields. `delete` does not report whether a row was removed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSampleRepository: Send + Sync {
    /// Count matches, then fetch the requested page when the count is non-zero.
    async fn search(
        &self,
        search: &CodeSampleSearch,
    ) -> Result<CodeSamplePage, CodeSampleRepositoryError>;

    /// Fetch one sample joined with its owner and language.
    async fn find_by_id(
        &self,
        id: &CodeSampleId,
    ) -> Result<Option<CodeSample>, CodeSampleRepositoryError>;

    /// Insert a new sample.
    async fn create(&self, sample: &CodeSample) -> Result<(), CodeSampleRepositoryError>;

    /// Overwrite the mutable fields of an existing sample.
    async fn update(&self, sample: &CodeSample) -> Result<(), CodeSampleRepositoryError>;

    /// Remove a sample by id.
    async fn delete(&self, id: &CodeSampleId) -> Result<(), CodeSampleRepositoryError>;
}
