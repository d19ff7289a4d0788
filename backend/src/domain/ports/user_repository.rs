//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{PasswordHash, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already taken by another row.
        DuplicateUsername { username: String } => "username {username} is already registered",
    }
}

/// Driven port over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and its password hash in one statement.
    async fn insert(&self, user: &User, hash: &PasswordHash) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with the stored hash, keyed by username.
    async fn find_credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(User, PasswordHash)>, UserPersistenceError>;
}
