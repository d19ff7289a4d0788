//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations. The
//! `code_samples.search_index` column is deliberately absent: it is a
//! `tsvector` only ever written and read through raw SQL.

diesel::table! {
    /// Registered users and their password hashes.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login name (max 255 characters).
        username -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seeded language reference data.
    languages (id) {
        /// Stable language code, e.g. `python`.
        id -> Varchar,
        /// Display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Code samples owned by users.
    code_samples (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; never changes after insert.
        submitted_by_id -> Uuid,
        /// Language code.
        language_id -> Varchar,
        /// Title text (search weight A).
        title -> Text,
        /// Description text (search weight B).
        description -> Text,
        /// Source text (search weight C).
        body -> Text,
        /// Creation timestamp.
        created -> Timestamptz,
        /// Last modification timestamp; `modified >= created`.
        modified -> Timestamptz,
    }
}

diesel::joinable!(code_samples -> users (submitted_by_id));
diesel::joinable!(code_samples -> languages (language_id));

diesel::allow_tables_to_appear_in_same_query!(code_samples, languages, users);
