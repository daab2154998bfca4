//! Typed error type for the db crate.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not hand out a live connection (open or ping failed).
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("{0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("row not found")]
    NotFound,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
