//! Credential service implementing the [`CredentialStore`] driving port.
//!
//! Hashing and verification go through the [`PasswordHasher`] port; the
//! stored hash never leaves this module.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CredentialStore, PasswordHashError, PasswordHasher, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserId};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateUsername { .. } => Error::duplicate_identity(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Same error for an unknown username and a wrong password.
fn no_matching_user() -> Error {
    Error::not_found("no user matches these credentials")
}

/// Credential store backed by a user repository and a password hasher.
#[derive(Clone)]
pub struct CredentialService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> CredentialService<R, H> {
    /// Create a credential service over the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<R, H> CredentialStore for CredentialService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn register_user(&self, registration: &Registration) -> Result<User, Error> {
        let hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::new(UserId::random(), registration.username().clone());

        self.users
            .insert(&user, &hash)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %user.id(), "registered user");
        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, Error> {
        debug!(user_id = %id, "loading user");
        self.users
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    async fn get_user_with_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<User, Error> {
        let Some((user, hash)) = self
            .users
            .find_credentials_by_username(credentials.username())
            .await
            .map_err(map_repository_error)?
        else {
            debug!("login rejected: unknown username");
            return Err(no_matching_user());
        };

        let verified = self
            .hasher
            .verify(credentials.password(), &hash)
            .await
            .map_err(map_hash_error)?;
        if !verified {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Err(no_matching_user());
        }

        info!(user_id = %user.id(), "user logged in");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
