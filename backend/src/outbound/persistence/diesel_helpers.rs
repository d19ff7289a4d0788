//! Shared error mapping for Diesel repository implementations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(crate) fn map_pool_error_message(error: PoolError) -> String {
    error.into_message()
}

/// Whether the error means the connection itself is gone.
pub(crate) fn is_connection_error(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
            | DieselError::BrokenTransactionManager
    )
}

/// Map a Diesel error through connection/query constructors, keeping the
/// raw database message and logging the failing operation.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    operation: &str,
    connection: impl FnOnce(String) -> E,
    query: impl FnOnce(String) -> E,
) -> E {
    let error_message = error.to_string();
    debug!(%error_message, %operation, "diesel operation failed");
    if is_connection_error(&error) {
        connection(error_message)
    } else {
        query(error_message)
    }
}

/// Collect row conversion results, mapping the first error through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
