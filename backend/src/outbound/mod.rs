//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel
//! - **security**: password hashing
//!
//! Adapters convert between domain types and infrastructure representations.
//! They contain no business logic.

pub mod persistence;
pub mod security;
