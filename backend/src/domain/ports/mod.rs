//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`CredentialStore`, `CodeSampleQuery`, `CodeSampleCommand`)
//! are called by inbound adapters. Driven ports (`UserRepository`,
//! `LanguageRepository`, `CodeSampleRepository`, `PasswordHasher`) are
//! implemented by outbound adapters and expose typed errors.

mod macros;
pub(crate) use macros::define_port_error;

mod code_sample_command;
mod code_sample_query;
mod code_sample_repository;
mod credential_store;
mod language_repository;
mod password_hasher;
mod user_repository;

#[cfg(test)]
pub use code_sample_command::MockCodeSampleCommand;
pub use code_sample_command::{CodeSampleCommand, FixtureCodeSampleCommand};
#[cfg(test)]
pub use code_sample_query::MockCodeSampleQuery;
pub use code_sample_query::{CodeSampleQuery, FixtureCodeSampleQuery};
#[cfg(test)]
pub use code_sample_repository::MockCodeSampleRepository;
pub use code_sample_repository::{CodeSampleRepository, CodeSampleRepositoryError};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, FixtureCredentialStore};
#[cfg(test)]
pub use language_repository::MockLanguageRepository;
pub use language_repository::{
    FixtureLanguageRepository, LanguageRepository, LanguageRepositoryError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{FixturePasswordHasher, PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
