// Storage error kinds
//
// Every store operation fails with one of these variants. Callers match on
// the variant, never on the message text.

use netmon_core::EventId;
use sqlx::error::ErrorKind;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Storage is unreachable (connection refused, pool exhausted, TLS failure)
    #[error("Unable to connect to database: {0}")]
    Connectivity(String),

    /// The write violated a data constraint (SQLSTATE class 22 or 23)
    #[error("Data integrity violation: {0}")]
    ConstraintViolation(String),

    /// An update matched no row
    #[error("Zero rows affected, expected at least one (eventId: {0})")]
    NotFoundOnUpdate(EventId),

    /// A write succeeded but the row could not be read back
    #[error("Event (eventId: {0}) missing after write")]
    MissingAfterWrite(EventId),

    /// Any other driver failure
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn is_connectivity(&self) -> bool {
        matches!(self, StoreError::Connectivity(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Connectivity(err.to_string()),
            sqlx::Error::Database(db_err) => {
                let class: Option<String> = db_err.code().map(|code| code.chars().take(2).collect());
                match class.as_deref() {
                    Some("22") | Some("23") => {
                        StoreError::ConstraintViolation(db_err.message().to_string())
                    }
                    // connection_exception, operator_intervention (e.g. admin shutdown)
                    Some("08") | Some("57") => StoreError::Connectivity(db_err.message().to_string()),
                    _ if !matches!(db_err.kind(), ErrorKind::Other) => {
                        StoreError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => StoreError::Database(err.to_string()),
                }
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_connectivity() {
        assert!(StoreError::from(sqlx::Error::PoolTimedOut).is_connectivity());
        assert!(StoreError::from(sqlx::Error::PoolClosed).is_connectivity());
    }

    #[test]
    fn test_io_error_is_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(StoreError::from(sqlx::Error::Io(io)).is_connectivity());
    }

    #[test]
    fn test_row_not_found_is_database_error() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            StoreError::NotFoundOnUpdate(9).to_string(),
            "Zero rows affected, expected at least one (eventId: 9)"
        );
        assert_eq!(
            StoreError::Connectivity("refused".into()).to_string(),
            "Unable to connect to database: refused"
        );
    }
}
