//! Driving port for code sample reads.

use async_trait::async_trait;

use crate::domain::{CodeSample, CodeSampleId, CodeSamplePage, CodeSampleSearch, Error};

/// Domain use-case port for searching and fetching samples.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSampleQuery: Send + Sync {
    /// Full-text search with optional language filter and pagination.
    async fn find_code_samples(&self, search: &CodeSampleSearch) -> Result<CodeSamplePage, Error>;

    /// Fetch a single sample; `not_found` when absent.
    async fn get_code_sample(&self, id: &CodeSampleId) -> Result<CodeSample, Error>;
}

/// Empty catalogue used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCodeSampleQuery;

#[async_trait]
impl CodeSampleQuery for FixtureCodeSampleQuery {
    async fn find_code_samples(&self, _search: &CodeSampleSearch) -> Result<CodeSamplePage, Error> {
        Ok(CodeSamplePage::empty())
    }

    async fn get_code_sample(&self, id: &CodeSampleId) -> Result<CodeSample, Error> {
        Err(Error::not_found(format!("code sample {id} not found")))
    }
}
