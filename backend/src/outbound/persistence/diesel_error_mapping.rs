//! Shared Diesel error classification for the marketplace repositories.
//!
//! Each repository owns its error type, so this module only sorts Diesel
//! failures into the three shapes the ports care about and leaves the final
//! constructor to the caller.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse outcome of a failed Diesel call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation,
    Query(&'static str),
}

/// Classify a Diesel error, logging the driver detail at debug level.
pub(crate) fn classify_diesel_error(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a Diesel error using only query and connection constructors.
///
/// Unique violations count as query failures here; repositories that expose
/// a dedicated duplicate variant match on [`classify_diesel_error`] instead.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::UniqueViolation => query("unique constraint violated"),
        DieselFailure::Query(message) => query(message),
    }
}

/// Map a pool error onto a repository's connection constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Query(String),
        Connection(String),
    }

    fn map(error: DieselError) -> TestError {
        map_basic_diesel_error(
            error,
            |message| TestError::Query(message.to_owned()),
            |message| TestError::Connection(message.to_owned()),
        )
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            map(DieselError::NotFound),
            TestError::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn rollback_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(&DieselError::RollbackTransaction),
            DieselFailure::Query("database error")
        );
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), TestError::Connection);
        assert_eq!(mapped, TestError::Connection("timed out".to_owned()));
    }
}
