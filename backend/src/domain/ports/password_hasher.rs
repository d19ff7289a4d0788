//! Driven port for the one-way password hashing primitive.
//!
//! Callers never compare hashes themselves; equality is only observable
//! through [`PasswordHasher::verify`].

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hash parameters were rejected by the primitive.
        Configuration { message: String } => "password hasher misconfigured: {message}",
        /// Hashing or verification could not complete.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, cost-parameterised password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derive a fresh salted hash for `password`.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Return whether `candidate` matches `hash`.
    ///
    /// A malformed stored hash is a mismatch, not an error.
    async fn verify(&self, candidate: &str, hash: &PasswordHash)
    -> Result<bool, PasswordHashError>;
}

/// Plaintext-prefix hasher for fixture wiring and tests.
///
/// Never use outside development: the "hash" is reversible.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

const FIXTURE_PREFIX: &str = "fixture$";

#[async_trait]
impl PasswordHasher for FixturePasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        Ok(PasswordHash::new(format!(
            "{FIXTURE_PREFIX}{}",
            password.expose()
        )))
    }

    async fn verify(
        &self,
        candidate: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        Ok(hash
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .is_some_and(|stored| stored == candidate))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::Registration;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_hasher_verifies_its_own_hashes() {
        let registration = Registration::try_from_parts("alice", "longenough1", "longenough1")
            .expect("valid registration");
        let hasher = FixturePasswordHasher;
        let hash = hasher
            .hash(registration.password())
            .await
            .expect("hash succeeds");

        assert!(hasher.verify("longenough1", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong-password", &hash).await.expect("verify"));
        assert!(
            !hasher
                .verify("longenough1", &PasswordHash::new("longenough1"))
                .await
                .expect("verify")
        );
    }
}
