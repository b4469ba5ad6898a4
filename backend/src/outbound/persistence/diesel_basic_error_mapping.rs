//! Shared Diesel error mapping for the ticket and chat repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification repositories turn into their own port errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the write.
    Duplicate,
    /// A foreign key pointed at a missing parent record.
    MissingParent,
    /// Anything else; the message is the database's own text.
    Query(String),
}

/// Message carried by a pool failure.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error.
///
/// Database messages are passed through so missing-index diagnostics in the
/// domain can inspect them.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::Duplicate
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StoreFailure::MissingParent
        }
        DieselError::DatabaseError(_, info) => {
            StoreFailure::Query(format!("database error: {}", info.message()))
        }
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound),
            StoreFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn rollback_is_a_generic_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::RollbackTransaction),
            StoreFailure::Query("database error".to_owned())
        );
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"), "timed out")]
    #[case(PoolError::build("bad url"), "bad url")]
    fn pool_errors_keep_their_message(#[case] error: PoolError, #[case] expected: &str) {
        assert_eq!(pool_error_message(error), expected);
    }
}
