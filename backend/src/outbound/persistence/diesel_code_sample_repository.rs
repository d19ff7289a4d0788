//! PostgreSQL-backed code sample repository with full-text search.
//!
//! Inserts and updates write the weighted `search_index` in the same
//! statement as the visible fields, so the index cannot drift.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_query;
use diesel::sql_types::{Text, Timestamptz, Uuid as SqlUuid, Varchar};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{CodeSampleRepository, CodeSampleRepositoryError};
use crate::domain::{CodeSample, CodeSampleId, CodeSamplePage, CodeSampleSearch};

use super::diesel_helpers::{collect_rows, map_diesel_error, map_pool_error_message};
use super::models::{CodeSampleRow, CountRow};
use super::pool::{DbPool, PoolError};
use super::schema::code_samples;
use super::search_statement::{SELECT_COLUMNS, SearchStatements, build_search_statements};

/// How the count and page statements of one search relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchConsistency {
    /// Two independent statements; a concurrent write between them may let
    /// `count` and the page length drift slightly.
    #[default]
    Relaxed,
    /// Both statements run in one `REPEATABLE READ, READ ONLY` transaction.
    Snapshot,
}

const INSERT_SQL: &str = r"
INSERT INTO code_samples
    (id, submitted_by_id, language_id, title, description, body, created, modified, search_index)
VALUES (
    $1, $2, $3, $4, $5, $6, $7, $8,
    setweight(to_tsvector('english', $4), 'A')
        || setweight(to_tsvector('english', $5), 'B')
        || setweight(to_tsvector('english', $6), 'C')
)
";

const UPDATE_SQL: &str = r"
UPDATE code_samples
SET language_id = $2,
    title = $3,
    description = $4,
    body = $5,
    modified = $6,
    search_index = setweight(to_tsvector('english', $3), 'A')
        || setweight(to_tsvector('english', $4), 'B')
        || setweight(to_tsvector('english', $5), 'C')
WHERE id = $1
";

const SNAPSHOT_SQL: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// Diesel-backed implementation of the code sample repository port.
#[derive(Clone)]
pub struct DieselCodeSampleRepository {
    pool: DbPool,
    consistency: SearchConsistency,
}

impl DieselCodeSampleRepository {
    /// Create a repository using [`SearchConsistency::Relaxed`] searches.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            consistency: SearchConsistency::default(),
        }
    }

    /// Select how searches pair their count and page statements.
    #[must_use]
    pub fn with_consistency(mut self, consistency: SearchConsistency) -> Self {
        self.consistency = consistency;
        self
    }
}

fn map_pool_error(error: PoolError) -> CodeSampleRepositoryError {
    CodeSampleRepositoryError::connection(map_pool_error_message(error))
}

fn map_query_error(error: DieselError, operation: &str) -> CodeSampleRepositoryError {
    map_diesel_error(
        error,
        operation,
        CodeSampleRepositoryError::connection,
        CodeSampleRepositoryError::query,
    )
}

/// Run the count statement and, only when it matches rows, the page statement.
async fn count_then_page(
    conn: &mut AsyncPgConnection,
    statements: SearchStatements,
) -> Result<(i64, Vec<CodeSampleRow>), DieselError> {
    let SearchStatements { count, page } = statements;
    let total: CountRow = count.into_query().get_result(conn).await?;
    if total.count == 0 {
        return Ok((0, Vec::new()));
    }
    let rows: Vec<CodeSampleRow> = page.into_query().load(conn).await?;
    Ok((total.count, rows))
}

#[async_trait]
impl CodeSampleRepository for DieselCodeSampleRepository {
    async fn search(
        &self,
        search: &CodeSampleSearch,
    ) -> Result<CodeSamplePage, CodeSampleRepositoryError> {
        let statements = build_search_statements(search);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (total, rows) = match self.consistency {
            SearchConsistency::Relaxed => count_then_page(&mut conn, statements).await,
            SearchConsistency::Snapshot => {
                conn.transaction::<_, DieselError, _>(|conn| {
                    async move {
                        sql_query(SNAPSHOT_SQL).execute(conn).await?;
                        count_then_page(conn, statements).await
                    }
                    .scope_boxed()
                })
                .await
            }
        }
        .map_err(|err| map_query_error(err, "search code samples"))?;

        let count = u64::try_from(total).map_err(|err| {
            CodeSampleRepositoryError::query(format!("negative match count {total}: {err}"))
        })?;
        if count == 0 {
            return Ok(CodeSamplePage::empty());
        }

        let mut page = CodeSamplePage::with_capacity(count, search.page());
        page.results.extend(collect_rows(
            rows.into_iter().map(CodeSampleRow::into_domain),
            CodeSampleRepositoryError::query,
        )?);
        debug!(count, returned = page.results.len(), "code sample search");
        Ok(page)
    }

    async fn find_by_id(
        &self,
        id: &CodeSampleId,
    ) -> Result<Option<CodeSample>, CodeSampleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CodeSampleRow> =
            sql_query(format!("{SELECT_COLUMNS} WHERE code_samples.id = $1"))
                .bind::<SqlUuid, _>(*id.as_uuid())
                .get_result(&mut conn)
                .await
                .optional()
                .map_err(|err| map_query_error(err, "find code sample"))?;

        row.map(CodeSampleRow::into_domain)
            .transpose()
            .map_err(CodeSampleRepositoryError::query)
    }

    async fn create(&self, sample: &CodeSample) -> Result<(), CodeSampleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query(INSERT_SQL)
            .bind::<SqlUuid, _>(*sample.id().as_uuid())
            .bind::<SqlUuid, _>(*sample.submitted_by().id().as_uuid())
            .bind::<Varchar, _>(sample.language().id().as_ref())
            .bind::<Text, _>(sample.title())
            .bind::<Text, _>(sample.description())
            .bind::<Text, _>(sample.body())
            .bind::<Timestamptz, _>(sample.created())
            .bind::<Timestamptz, _>(sample.modified())
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_query_error(err, "insert code sample"))
    }

    async fn update(&self, sample: &CodeSample) -> Result<(), CodeSampleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        sql_query(UPDATE_SQL)
            .bind::<SqlUuid, _>(*sample.id().as_uuid())
            .bind::<Varchar, _>(sample.language().id().as_ref())
            .bind::<Text, _>(sample.title())
            .bind::<Text, _>(sample.description())
            .bind::<Text, _>(sample.body())
            .bind::<Timestamptz, _>(sample.modified())
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_query_error(err, "update code sample"))
    }

    async fn delete(&self, id: &CodeSampleId) -> Result<(), CodeSampleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(code_samples::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_query_error(err, "delete code sample"))
    }
}
