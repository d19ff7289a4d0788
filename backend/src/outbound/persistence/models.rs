//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{Text, Timestamptz, Uuid as SqlUuid, Varchar};
use uuid::Uuid;

use crate::domain::{
    CodeSample, CodeSampleId, CodeSampleParts, Language, LanguageId, User, UserId, Username,
};

use super::schema::{languages, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
}

/// Row struct for credential lookups, including the stored hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserCredentialsRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the languages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = languages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LanguageRow {
    pub id: String,
    pub name: String,
}

/// Joined code sample row returned by raw SQL reads.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct CodeSampleRow {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = SqlUuid)]
    pub submitted_by_id: Uuid,
    #[diesel(sql_type = Varchar)]
    pub submitted_by_username: String,
    #[diesel(sql_type = Varchar)]
    pub language_id: String,
    #[diesel(sql_type = Varchar)]
    pub language_name: String,
    #[diesel(sql_type = Text)]
    pub title: String,
    #[diesel(sql_type = Text)]
    pub description: String,
    #[diesel(sql_type = Text)]
    pub body: String,
    #[diesel(sql_type = Timestamptz)]
    pub created: DateTime<Utc>,
    #[diesel(sql_type = Timestamptz)]
    pub modified: DateTime<Utc>,
}

/// Row returned by `SELECT COUNT(*) AS count`.
#[derive(Debug, Clone, Copy, QueryableByName)]
pub(crate) struct CountRow {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub count: i64,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        let username = Username::new(&self.username)
            .map_err(|err| format!("stored username for {} is invalid: {err}", self.id))?;
        Ok(User::new(UserId::from_uuid(self.id), username))
    }
}

impl LanguageRow {
    pub(crate) fn into_domain(self) -> Result<Language, String> {
        let id = LanguageId::new(self.id.as_str())
            .map_err(|err| format!("stored language id {} is invalid: {err}", self.id))?;
        Ok(Language::new(id, self.name))
    }
}

impl CodeSampleRow {
    pub(crate) fn into_domain(self) -> Result<CodeSample, String> {
        let submitted_by = UserRow {
            id: self.submitted_by_id,
            username: self.submitted_by_username,
        }
        .into_domain()?;
        let language = LanguageRow {
            id: self.language_id,
            name: self.language_name,
        }
        .into_domain()?;
        CodeSample::new(CodeSampleParts {
            id: CodeSampleId::from_uuid(self.id),
            submitted_by,
            language,
            title: self.title,
            description: self.description,
            body: self.body,
            created: self.created,
            modified: self.modified,
        })
        .map_err(|err| format!("stored code sample {} is invalid: {err}", self.id))
    }
}
