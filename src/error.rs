use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("already exists")]
    AlreadyExists,

    #[error("password hash error: {0}")]
    PasswordHash(String),
}

pub type Result<T> = std::result::Result<T, Error>;
