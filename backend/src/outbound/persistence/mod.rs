//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the driven repository ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! - **Thin adapters**: repositories translate between Diesel rows and domain
//!   types. Ownership and validation live in the domain services.
//! - **Internal models**: row structs (`models.rs`), the table definitions
//!   (`schema.rs`) and the search statement builder are private.
//! - **Typed errors**: Diesel and pool failures map onto port error enums.
//!
//! # Example
//!
//! ```ignore
//! use codelibrary::outbound::persistence::{DbPool, DieselCodeSampleRepository, PoolConfig};
//!
//! let pool = DbPool::connect(PoolConfig::new("postgres://localhost/codelibrary")).await?;
//! let samples = DieselCodeSampleRepository::new(pool);
//! ```

mod diesel_code_sample_repository;
pub(crate) mod diesel_helpers;
mod diesel_language_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod search_statement;

pub use diesel_code_sample_repository::{DieselCodeSampleRepository, SearchConsistency};
pub use diesel_language_repository::DieselLanguageRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DEFAULT_CHECKOUT_TIMEOUT, DbPool, PoolConfig, PoolError, PoolStage};
