//! Code sample services: search, reads, and the ownership-scoped write flow.
//!
//! Writes follow identity, then existing row, then ownership, then language.
//! A non-owner is rejected before the submitted fields are looked at.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CodeSampleCommand, CodeSampleQuery, CodeSampleRepository, CodeSampleRepositoryError,
    LanguageRepository, LanguageRepositoryError,
};
use crate::domain::{
    CodeSample, CodeSampleDraft, CodeSampleId, CodeSamplePage, CodeSampleParts, CodeSampleSearch,
    Error, FieldError, Language, LanguageId, SubmissionTarget, User,
};

const NOT_OWNER: &str = "Not your code sample";

fn map_sample_error(error: CodeSampleRepositoryError) -> Error {
    match error {
        CodeSampleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("code sample repository unavailable: {message}"))
        }
        CodeSampleRepositoryError::Query { message } => Error::internal(message),
    }
}

fn map_language_error(error: LanguageRepositoryError) -> Error {
    match error {
        LanguageRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("language repository unavailable: {message}"))
        }
        LanguageRepositoryError::Query { message } => Error::internal(message),
    }
}

fn language_not_found(raw: &str) -> Error {
    Error::not_found(format!("language {raw} not found")).with_field_error(FieldError::new(
        "notFound",
        "Not found",
        ["body", "languageId"],
    ))
}

/// Code sample service implementing the query and command driving ports.
#[derive(Clone)]
pub struct CodeSampleService<S, L> {
    samples: Arc<S>,
    languages: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<S, L> CodeSampleService<S, L> {
    /// Create a service over the sample store, language registry, and clock.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use codelibrary::domain::CodeSampleService;
    /// # use codelibrary::domain::ports::FixtureLanguageRepository;
    /// # use mockable::DefaultClock;
    /// # struct Store;
    /// let languages = Arc::new(FixtureLanguageRepository::default());
    /// let service = CodeSampleService::new(Arc::new(Store), languages, Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(samples: Arc<S>, languages: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            samples,
            languages,
            clock,
        }
    }
}

impl<S, L> CodeSampleService<S, L>
where
    S: CodeSampleRepository,
    L: LanguageRepository,
{
    /// Current time at the microsecond precision `timestamptz` stores.
    fn stamp(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }

    async fn resolve_language(&self, raw: &str) -> Result<Language, Error> {
        let Ok(id) = LanguageId::new(raw) else {
            return Err(language_not_found(raw));
        };
        self.languages
            .find_by_id(&id)
            .await
            .map_err(map_language_error)?
            .ok_or_else(|| language_not_found(raw))
    }

    async fn load_existing(&self, id: &CodeSampleId) -> Result<CodeSample, Error> {
        self.samples
            .find_by_id(id)
            .await
            .map_err(map_sample_error)?
            .ok_or_else(|| Error::not_found(format!("code sample {id} not found")))
    }

    async fn create(&self, actor: &User, draft: CodeSampleDraft) -> Result<CodeSample, Error> {
        let language = self.resolve_language(&draft.language_id).await?;
        let now = self.stamp();
        let CodeSampleDraft {
            title,
            description,
            body,
            ..
        } = draft;
        let sample = CodeSample::new(CodeSampleParts {
            id: CodeSampleId::random(),
            submitted_by: actor.clone(),
            language,
            title,
            description,
            body,
            created: now,
            modified: now,
        })
        .map_err(|err| Error::internal(err.to_string()))?;

        self.samples
            .create(&sample)
            .await
            .map_err(map_sample_error)?;
        info!(sample_id = %sample.id(), user_id = %actor.id(), "created code sample");
        Ok(sample)
    }

    async fn update(
        &self,
        actor: &User,
        target_id: CodeSampleId,
        draft: CodeSampleDraft,
    ) -> Result<CodeSample, Error> {
        let existing = self.load_existing(&target_id).await?;
        if existing.submitted_by().id() != actor.id() {
            debug!(sample_id = %target_id, user_id = %actor.id(), "update rejected: not owner");
            return Err(Error::forbidden(NOT_OWNER));
        }

        let language = self.resolve_language(&draft.language_id).await?;
        let revised = existing.revise(language, draft, self.stamp());
        self.samples
            .update(&revised)
            .await
            .map_err(map_sample_error)?;
        info!(sample_id = %target_id, user_id = %actor.id(), "updated code sample");
        Ok(revised)
    }
}

#[async_trait]
impl<S, L> CodeSampleQuery for CodeSampleService<S, L>
where
    S: CodeSampleRepository,
    L: LanguageRepository,
{
    async fn find_code_samples(&self, search: &CodeSampleSearch) -> Result<CodeSamplePage, Error> {
        let page = self
            .samples
            .search(search)
            .await
            .map_err(map_sample_error)?;
        debug!(
            count = page.count,
            returned = page.results.len(),
            page = search.page().page(),
            "searched code samples"
        );
        Ok(page)
    }

    async fn get_code_sample(&self, id: &CodeSampleId) -> Result<CodeSample, Error> {
        debug!(sample_id = %id, "loading code sample");
        self.load_existing(id).await
    }
}

#[async_trait]
impl<S, L> CodeSampleCommand for CodeSampleService<S, L>
where
    S: CodeSampleRepository,
    L: LanguageRepository,
{
    async fn submit(
        &self,
        actor: &User,
        target: SubmissionTarget,
        draft: CodeSampleDraft,
    ) -> Result<CodeSample, Error> {
        match target {
            SubmissionTarget::Create => self.create(actor, draft).await,
            SubmissionTarget::Update { target_id } => self.update(actor, target_id, draft).await,
        }
    }

    async fn delete(&self, actor: &User, id: &CodeSampleId) -> Result<(), Error> {
        let existing = self.load_existing(id).await?;
        if existing.submitted_by().id() != actor.id() {
            debug!(sample_id = %id, user_id = %actor.id(), "delete rejected: not owner");
            return Err(Error::forbidden(NOT_OWNER).with_field_error(FieldError::new(
                "forbidden",
                NOT_OWNER,
                ["params", "id"],
            )));
        }

        self.samples.delete(id).await.map_err(map_sample_error)?;
        info!(sample_id = %id, user_id = %actor.id(), "deleted code sample");
        Ok(())
    }
}

#[cfg(test)]
#[path = "code_sample_service_tests.rs"]
mod tests;
