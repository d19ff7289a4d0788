//! Driving port for ownership-scoped code sample mutations.

use async_trait::async_trait;

use crate::domain::{CodeSample, CodeSampleDraft, CodeSampleId, Error, SubmissionTarget, User};

/// Domain use-case port for creating, editing, and deleting samples.
///
/// `actor` is the identity already resolved from the session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeSampleCommand: Send + Sync {
    /// Create a sample or overwrite one the actor owns.
    async fn submit(
        &self,
        actor: &User,
        target: SubmissionTarget,
        draft: CodeSampleDraft,
    ) -> Result<CodeSample, Error>;

    /// Delete a sample the actor owns.
    async fn delete(&self, actor: &User, id: &CodeSampleId) -> Result<(), Error>;
}

/// Command port used when no database is configured; every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCodeSampleCommand;

#[async_trait]
impl CodeSampleCommand for FixtureCodeSampleCommand {
    async fn submit(
        &self,
        _actor: &User,
        _target: SubmissionTarget,
        _draft: CodeSampleDraft,
    ) -> Result<CodeSample, Error> {
        Err(Error::service_unavailable(
            "code sample storage requires a configured database",
        ))
    }

    async fn delete(&self, _actor: &User, id: &CodeSampleId) -> Result<(), Error> {
        Err(Error::not_found(format!("code sample {id} not found")))
    }
}
