use courier_db::DbError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input, caught before the store is touched.
    #[error("{0}")]
    Validation(String),

    /// Unknown user or wrong password. Deliberately says nothing about which.
    #[error("incorrect password or user does not exist")]
    AuthenticationFailed,

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("user {0:?} already exists")]
    DuplicateUser(String),

    #[error(transparent)]
    Store(DbError),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl From<DbError> for AppError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateUser(name) => AppError::DuplicateUser(name),
            e @ (DbError::MessageTooLong { .. } | DbError::EmptyUsername) => {
                AppError::Validation(e.to_string())
            }
            e => AppError::Store(e),
        }
    }
}
