use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("category \"{0}\" not found")]
    CategoryNotFound(String),

    #[error("not found")]
    NotFound,

    #[error("email already registered")]
    EmailTaken,

    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid token format")]
    InvalidTokenFormat,

    #[error("token expired")]
    TokenExpired,
}

pub type Result<T> = std::result::Result<T, Error>;
