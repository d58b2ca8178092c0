//! Shared helpers for Diesel repository implementations.
//!
//! - pool and Diesel error mapping onto connection/query constructors;
//! - lossless conversion of unsigned domain counters into `INT4` columns;
//! - difficulty labels stored as text.

use std::str::FromStr;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::Difficulty;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// Database messages are logged at debug level and never copied into the
/// returned error.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Convert a domain counter into an `INT4` column value.
pub(crate) fn to_db_int(value: u32, column: &'static str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{column} value {value} exceeds INT4 range"))
}

/// Convert an `INT4` column value into a domain counter.
pub(crate) fn from_db_int(value: i32, column: &'static str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("{column} holds negative value {value}"))
}

pub(crate) fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(raw).map_err(|err| err.to_string())
}
