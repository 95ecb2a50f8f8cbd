//! Error types for charmstore-core.

use charmstore_config::error::ConfigError;
use charmstore_db::error::DbError;
use charmstore_utils::error::{HashError, PathError, UtilsError};
use miette::Diagnostic;
use thiserror::Error;

/// The closed set of failure classes a catalog request can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// HTTP-equivalent status code.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::NotFound => 404,
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Internal => 500,
        }
    }

    /// Wire code reported in error bodies.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::BadRequest => "bad request",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Core error type for catalog operations.
#[derive(Error, Diagnostic, Debug)]
pub enum CatalogError {
    #[error("{message}")]
    #[diagnostic(
        code(charmstore::not_found),
        help("Run 'charmstore list' to see what is published")
    )]
    NotFound { input: String, message: String },

    #[error("invalid reference {input:?}: {reason}")]
    #[diagnostic(
        code(charmstore::invalid_reference),
        help("Use format: [cs:][~user/][series/]name[-revision] (e.g. 'trusty/wordpress-25')")
    )]
    InvalidReference { input: String, reason: String },

    #[error("invalid {argument}: {reason}")]
    #[diagnostic(
        code(charmstore::invalid_argument),
        help("Extra info is passed as key=value; values may be JSON literals")
    )]
    InvalidArgument { argument: String, reason: String },

    #[error("{0} already exists")]
    #[diagnostic(
        code(charmstore::already_exists),
        help("Omit the revision to publish the next one")
    )]
    AlreadyExists(String),

    #[error("{0}")]
    #[diagnostic(
        code(charmstore::unauthorized),
        help("Pass --as <user> to make the request as a user on the read ACL")
    )]
    Unauthorized(String),

    #[error("Database operation failed: {0}")]
    #[diagnostic(
        code(charmstore::database),
        help("Check that the catalog database is readable and not corrupted")
    )]
    Database(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Utils(#[from] UtilsError),

    #[error("Error while {action}")]
    #[diagnostic(code(charmstore::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(charmstore::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error(transparent)]
    #[diagnostic(code(charmstore::json))]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// The failure class this error reports as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidReference { .. }
            | Self::InvalidArgument { .. }
            | Self::AlreadyExists(_) => ErrorKind::BadRequest,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Database(_)
            | Self::Config(_)
            | Self::Utils(_)
            | Self::IoError { .. }
            | Self::PoisonError
            | Self::Json(_) => ErrorKind::Internal,
        }
    }

    pub fn not_found(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn invalid_reference(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::AlreadyExists(msg) => Self::AlreadyExists(msg),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<diesel::result::Error> for CatalogError {
    fn from(err: diesel::result::Error) -> Self {
        DbError::from(err).into()
    }
}

impl From<HashError> for CatalogError {
    fn from(err: HashError) -> Self {
        Self::Utils(err.into())
    }
}

impl From<PathError> for CatalogError {
    fn from(err: PathError) -> Self {
        Self::Utils(err.into())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CatalogError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, CatalogError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, CatalogError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            CatalogError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
