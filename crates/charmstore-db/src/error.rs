//! Error types for charmstore-db.

use diesel::result::DatabaseErrorKind;
use miette::Diagnostic;
use thiserror::Error;

/// Database error type for charmstore-db operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    #[diagnostic(
        code(charmstore_db::connection),
        help("Check if the database file exists and is accessible")
    )]
    ConnectionError(String),

    #[error("Database query failed: {0}")]
    #[diagnostic(code(charmstore_db::query))]
    QueryError(String),

    #[error("Database migration failed: {0}")]
    #[diagnostic(
        code(charmstore_db::migration),
        help("The database schema may be corrupted or newer than this binary")
    )]
    MigrationError(String),

    #[error("Record not found: {0}")]
    #[diagnostic(code(charmstore_db::not_found))]
    NotFound(String),

    #[error("Record already exists: {0}")]
    #[diagnostic(
        code(charmstore_db::already_exists),
        help("Publish a new revision instead of overwriting an existing one")
    )]
    AlreadyExists(String),

    #[error("Database integrity error: {0}")]
    #[diagnostic(
        code(charmstore_db::integrity),
        help("The database may be corrupted")
    )]
    IntegrityError(String),
}

impl From<diesel::result::Error> for DbError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => DbError::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DbError::AlreadyExists(info.message().to_string())
            }
            diesel::result::Error::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation | DatabaseErrorKind::CheckViolation,
                info,
            ) => DbError::IntegrityError(info.message().to_string()),
            diesel::result::Error::DatabaseError(_, info) => {
                DbError::QueryError(info.message().to_string())
            }
            other => DbError::QueryError(other.to_string()),
        }
    }
}

impl From<diesel::result::ConnectionError> for DbError {
    fn from(err: diesel::result::ConnectionError) -> Self {
        DbError::ConnectionError(err.to_string())
    }
}

/// Result type alias for charmstore-db operations.
pub type Result<T> = std::result::Result<T, DbError>;
