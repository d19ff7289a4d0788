//! Per-test databases on an embedded PostgreSQL cluster.
//!
//! Every [`TestDatabase`] owns its cluster, a freshly created database with
//! the embedded migrations applied through the production migration runner,
//! and a small Diesel pool bound to it.

use codelibrary::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use pg_embedded_setup_unpriv::TestCluster;
use postgres::{Client, NoTls};
use tokio::runtime::Runtime;
use uuid::Uuid;

use super::pg_embed::start_cluster;

/// A migrated database plus the runtime used to drive async adapters.
///
/// Fields drop in declaration order: the pool closes before the runtime and
/// the cluster stops last.
pub struct TestDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    pub url: String,
    _cluster: TestCluster,
}

impl TestDatabase {
    /// Block on `future` using the database's runtime.
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

/// Render a `postgres` error with its SQLSTATE and server message.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

fn create_database(admin_url: &str) -> Result<String, String> {
    let name = format!("codelibrary_{}", Uuid::new_v4().simple());
    let mut client =
        Client::connect(admin_url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(&format!("CREATE DATABASE \"{name}\""))
        .map_err(|err| format_postgres_error(&err))?;
    Ok(name)
}

/// Start a cluster, create and migrate a database, and open a pool on it.
///
/// # Errors
///
/// Returns a readable message from whichever step failed.
pub fn test_database() -> Result<TestDatabase, String> {
    let cluster = start_cluster()?;
    let name = create_database(&cluster.connection().database_url("postgres"))?;
    let url = cluster.connection().database_url(&name);

    let applied = run_migrations(&url).map_err(|err| err.to_string())?;
    if applied == 0 {
        return Err(format!("no migrations applied to {name}"));
    }

    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let pool = runtime
        .block_on(DbPool::connect(PoolConfig::new(&url).with_max_size(4)))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        pool,
        runtime,
        url,
        _cluster: cluster,
    })
}
