//! Custom error types for the common library
//!
//! This module defines the persistence error taxonomy shared by every
//! repository. Callers distinguish "no row matched" from genuine
//! infrastructure failures through [`DatabaseError::RecordNotFound`].

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred while acquiring or opening a connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// No row matched the statement's filter
    #[error("Record not found")]
    RecordNotFound,

    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint rejected the write
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
}

impl DatabaseError {
    /// Classify a raw sqlx error into the repository taxonomy
    pub fn from_sqlx(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => DatabaseError::RecordNotFound,
            SqlxError::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or_default().to_string();
                if db_err.is_unique_violation() {
                    DatabaseError::UniqueViolation(constraint)
                } else if db_err.is_foreign_key_violation() {
                    DatabaseError::ForeignKeyViolation(constraint)
                } else {
                    DatabaseError::Query(SqlxError::Database(db_err))
                }
            }
            e @ (SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_)) => {
                DatabaseError::Connection(e)
            }
            other => DatabaseError::Query(other),
        }
    }

    /// Whether this error is the "no row matched" signal
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::RecordNotFound)
    }
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        DatabaseError::from_sqlx(err)
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
