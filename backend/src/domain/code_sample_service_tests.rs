//! Tests for the code sample service and its ownership checks.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{FixtureLanguageRepository, MockCodeSampleRepository};
use crate::domain::{ErrorCode, UserId, Username};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn now() -> DateTime<Utc> {
    created_at() + Duration::days(2)
}

fn user(name: &str) -> User {
    User::new(UserId::random(), Username::new(name).expect("fixture username"))
}

#[fixture]
fn owner() -> User {
    user("alice")
}

fn language(id: &str, name: &str) -> Language {
    Language::new(LanguageId::new(id).expect("fixture language"), name)
}

fn stored_sample(owner: &User) -> CodeSample {
    CodeSample::new(CodeSampleParts {
        id: CodeSampleId::random(),
        submitted_by: owner.clone(),
        language: language("python", "Python"),
        title: "Hello".to_owned(),
        description: "Prints a greeting".to_owned(),
        body: "print('hello')".to_owned(),
        created: created_at(),
        modified: created_at(),
    })
    .expect("valid sample")
}

fn draft(language_id: &str) -> CodeSampleDraft {
    CodeSampleDraft {
        language_id: language_id.to_owned(),
        title: "Borrowing".to_owned(),
        description: "Shared references".to_owned(),
        body: "let r = &value;".to_owned(),
    }
}

fn service(
    repo: MockCodeSampleRepository,
) -> CodeSampleService<MockCodeSampleRepository, FixtureLanguageRepository> {
    service_at(repo, now())
}

fn service_at(
    repo: MockCodeSampleRepository,
    utc_now: DateTime<Utc>,
) -> CodeSampleService<MockCodeSampleRepository, FixtureLanguageRepository> {
    CodeSampleService::new(
        Arc::new(repo),
        Arc::new(FixtureLanguageRepository::default()),
        Arc::new(FixtureClock { utc_now }),
    )
}

/// `now()` plus 123.456789 ms; the trailing 789 ns fall below `timestamptz`.
fn fine_grained_now() -> DateTime<Utc> {
    now() + Duration::nanoseconds(123_456_789)
}

fn microsecond_now() -> DateTime<Utc> {
    now() + Duration::microseconds(123_456)
}

#[rstest]
#[tokio::test]
async fn create_stamps_both_timestamps_and_owner(owner: User) {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_create()
        .withf(|sample| sample.created() == sample.modified())
        .times(1)
        .return_once(|_| Ok(()));

    let sample = service(repo)
        .submit(&owner, SubmissionTarget::Create, draft("rust"))
        .await
        .expect("create succeeds");

    assert_eq!(sample.submitted_by(), &owner);
    assert_eq!(sample.created(), now());
    assert_eq!(sample.modified(), now());
    assert_eq!(sample.language().name(), "Rust");
    assert_eq!(sample.title(), "Borrowing");
}

#[rstest]
#[case("cobol")]
#[case("Not A Code")]
#[tokio::test]
async fn create_rejects_unknown_language(owner: User, #[case] language_id: &str) {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_create().times(0);

    let error = service(repo)
        .submit(&owner, SubmissionTarget::Create, draft(language_id))
        .await
        .expect_err("unknown language");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.details()[0].location(), ["body", "languageId"]);
}

#[rstest]
#[tokio::test]
async fn update_by_owner_keeps_created_and_bumps_modified(owner: User) {
    let existing = stored_sample(&owner);
    let target_id = *existing.id();
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update()
        .withf(move |sample| *sample.id() == target_id)
        .times(1)
        .return_once(|_| Ok(()));

    let updated = service(repo)
        .submit(&owner, SubmissionTarget::Update { target_id }, draft("rust"))
        .await
        .expect("update succeeds");

    assert_eq!(updated.created(), created_at());
    assert_eq!(updated.modified(), now());
    assert_eq!(updated.submitted_by(), &owner);
    assert_eq!(updated.language().id().as_ref(), "rust");
}

#[rstest]
#[tokio::test]
async fn create_stores_microsecond_timestamps(owner: User) {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_create()
        .withf(|sample| sample.created() == microsecond_now())
        .times(1)
        .return_once(|_| Ok(()));

    let sample = service_at(repo, fine_grained_now())
        .submit(&owner, SubmissionTarget::Create, draft("rust"))
        .await
        .expect("create succeeds");

    assert_eq!(sample.created(), microsecond_now());
    assert_eq!(sample.modified(), microsecond_now());
}

#[rstest]
#[tokio::test]
async fn update_stores_microsecond_modified(owner: User) {
    let existing = stored_sample(&owner);
    let target_id = *existing.id();
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update()
        .withf(|sample| sample.modified() == microsecond_now())
        .times(1)
        .return_once(|_| Ok(()));

    let updated = service_at(repo, fine_grained_now())
        .submit(&owner, SubmissionTarget::Update { target_id }, draft("rust"))
        .await
        .expect("update succeeds");

    assert_eq!(updated.created(), created_at());
    assert_eq!(updated.modified(), microsecond_now());
}

#[rstest]
#[tokio::test]
async fn update_by_non_owner_is_forbidden_before_language_check(owner: User) {
    let existing = stored_sample(&owner);
    let target_id = *existing.id();
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_update().times(0);

    let error = service(repo)
        .submit(
            &user("mallory"),
            SubmissionTarget::Update { target_id },
            draft("cobol"),
        )
        .await
        .expect_err("non-owner update");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.details()[0].location(), ["body"]);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_sample_is_not_found(owner: User) {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));
    repo.expect_update().times(0);

    let error = service(repo)
        .submit(
            &owner,
            SubmissionTarget::Update {
                target_id: CodeSampleId::random(),
            },
            draft("rust"),
        )
        .await
        .expect_err("missing sample");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn delete_by_owner_removes_the_row(owner: User) {
    let existing = stored_sample(&owner);
    let id = *existing.id();
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_delete()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .return_once(|_| Ok(()));

    service(repo)
        .delete(&owner, &id)
        .await
        .expect("delete succeeds");
}

#[rstest]
#[tokio::test]
async fn delete_by_non_owner_is_forbidden_and_does_not_mutate(owner: User) {
    let existing = stored_sample(&owner);
    let id = *existing.id();
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(existing)));
    repo.expect_delete().times(0);

    let error = service(repo)
        .delete(&user("mallory"), &id)
        .await
        .expect_err("non-owner delete");

    assert_eq!(error.code(), ErrorCode::Forbidden);
    assert_eq!(error.details()[0].location(), ["params", "id"]);
}

#[rstest]
#[case(CodeSampleRepositoryError::connection("pool exhausted"), ErrorCode::ServiceUnavailable)]
#[case(CodeSampleRepositoryError::query("canceling statement"), ErrorCode::InternalError)]
#[tokio::test]
async fn search_surfaces_store_errors(
    #[case] failure: CodeSampleRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_search()
        .times(1)
        .return_once(move |_| Err(failure));
    let search = CodeSampleSearch::new("hello", BTreeSet::new(), PageRequest::default());

    let error = service(repo)
        .find_code_samples(&search)
        .await
        .expect_err("search fails");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn search_passes_the_page_through(owner: User) {
    let sample = stored_sample(&owner);
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_search().times(1).return_once(move |_| {
        Ok(CodeSamplePage {
            count: 21,
            results: vec![sample],
        })
    });
    let search = CodeSampleSearch::new(
        "hello",
        BTreeSet::new(),
        PageRequest::new(2, 20).expect("valid page"),
    );

    let page = service(repo)
        .find_code_samples(&search)
        .await
        .expect("search succeeds");

    assert_eq!(page.count, 21);
    assert_eq!(page.results.len(), 1);
}

#[rstest]
#[tokio::test]
async fn get_code_sample_reports_missing_rows() {
    let mut repo = MockCodeSampleRepository::new();
    repo.expect_find_by_id().times(1).return_once(|_| Ok(None));

    let error = service(repo)
        .get_code_sample(&CodeSampleId::random())
        .await
        .expect_err("missing sample");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
