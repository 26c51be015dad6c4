use courier_crypto::CredentialError;
use rusqlite::ErrorCode;
use rusqlite::ffi;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("user {0:?} already exists")]
    DuplicateUser(String),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("sender or recipient does not exist")]
    ForeignKeyViolation,

    #[error("entity has not been saved yet")]
    NotPersisted,

    #[error("no such row")]
    NotFound,

    #[error("message is {len} characters long, the limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("cannot reach the database: {0}")]
    ConnectionFailure(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl DbError {
    /// Treat any failure as the store being unreachable. Used when opening.
    pub(crate) fn connection(e: rusqlite::Error) -> Self {
        DbError::ConnectionFailure(e.to_string())
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            rusqlite::Error::SqliteFailure(err, _) => match err.code {
                ErrorCode::ConstraintViolation
                    if err.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
                {
                    DbError::ForeignKeyViolation
                }
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked => DbError::ConnectionFailure(e.to_string()),
                _ => DbError::Sqlite(e),
            },
            _ => DbError::Sqlite(e),
        }
    }
}

/// True when `e` is a UNIQUE constraint failure.
pub(crate) fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
