//! PostgreSQL-backed language registry.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{LanguageRepository, LanguageRepositoryError};
use crate::domain::{Language, LanguageId};

use super::diesel_helpers::{map_diesel_error, map_pool_error_message};
use super::models::LanguageRow;
use super::pool::DbPool;
use super::schema::languages;

/// Diesel-backed implementation of the language repository port.
#[derive(Clone)]
pub struct DieselLanguageRepository {
    pool: DbPool,
}

impl DieselLanguageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LanguageRepository for DieselLanguageRepository {
    async fn find_by_id(
        &self,
        id: &LanguageId,
    ) -> Result<Option<Language>, LanguageRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| LanguageRepositoryError::connection(map_pool_error_message(err)))?;

        let row: Option<LanguageRow> = languages::table
            .find(id.as_ref())
            .select(LanguageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| {
                map_diesel_error(
                    err,
                    "find language",
                    LanguageRepositoryError::connection,
                    LanguageRepositoryError::query,
                )
            })?;

        row.map(LanguageRow::into_domain)
            .transpose()
            .map_err(LanguageRepositoryError::query)
    }
}
