//! Driving port for registration, login, and identity lookups.
//!
//! Inbound adapters call it to authenticate without knowing the backing
//! infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId, Username};

/// Domain use-case port for user credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Hash the password and persist a new user with a fresh id.
    ///
    /// Fails with `duplicate_identity` when the username is taken.
    async fn register_user(&self, registration: &Registration) -> Result<User, Error>;

    /// Resolve a user by id; `not_found` when absent.
    async fn get_user(&self, id: &UserId) -> Result<User, Error>;

    /// Resolve a user by username and verify the password.
    ///
    /// An unknown username and a wrong password both yield the same
    /// `not_found` error; the login handler reports it as
    /// `invalid_credentials`.
    async fn get_user_with_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, Error>;
}

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// In-memory credential store used when no database is configured.
///
/// `admin` / `password` authenticates as a fixed user; registration is
/// unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialStore;

impl FixtureCredentialStore {
    fn fixture_user() -> Result<User, Error> {
        let id = UserId::new(FIXTURE_USER_ID)
            .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))?;
        let username = Username::new(FIXTURE_USERNAME)
            .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
        Ok(User::new(id, username))
    }
}

#[async_trait]
impl CredentialStore for FixtureCredentialStore {
    async fn register_user(&self, _registration: &Registration) -> Result<User, Error> {
        Err(Error::service_unavailable(
            "registration requires a configured database",
        ))
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        let user = Self::fixture_user()?;
        if user.id() == id {
            Ok(user)
        } else {
            Err(Error::not_found(format!("user {id} not found")))
        }
    }

    async fn get_user_with_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            Self::fixture_user()
        } else {
            Err(Error::not_found("no user matches these credentials"))
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn fixture_store_accepts_only_the_fixture_login(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureCredentialStore.get_user_with_credentials(&creds).await;
        match (should_succeed, result) {
            (true, Ok(user)) => assert_eq!(user.id().to_string(), FIXTURE_USER_ID),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::NotFound),
            (true, Err(err)) => panic!("expected success, got error: {err:?}"),
            (false, Ok(user)) => panic!("expected failure, got success: {user:?}"),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_store_resolves_only_the_fixture_id() {
        let known = UserId::new(FIXTURE_USER_ID).expect("fixture id");
        assert!(FixtureCredentialStore.get_user(&known).await.is_ok());

        let err = FixtureCredentialStore
            .get_user(&UserId::random())
            .await
            .expect_err("unknown id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
