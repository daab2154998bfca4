//! Errors a handler can end in, each rendered through the `Error` view.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::DbError;
use minijinja::context;
use thiserror::Error;
use tracing::{error, warn};

use crate::views::{self, View};

#[derive(Debug, Error)]
pub enum ApiError {
    /// No live connection could be checked out of the pool.
    #[error("Unable to connect to database")]
    Unavailable(#[source] DbError),

    /// A statement failed to prepare, execute, or decode.
    #[error("{0}")]
    Database(DbError),

    /// The referential guard refused to delete a category.
    #[error("Cannot delete category that is in use by tools")]
    CategoryInUse { category_id: i64, tools: i64 },

    /// The request did not finish within the server's time limit.
    #[error("Request timed out after {} seconds", .0.as_secs_f64())]
    Timeout(Duration),

    /// Query string or form body could not be parsed.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) | Self::Database(_) | Self::Timeout(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::CategoryInUse { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::Unavailable(_) => Self::Unavailable(e),
            other => Self::Database(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unavailable(source) => error!("Database connection failed: {source}"),
            Self::Database(source) => error!("Database error: {source}"),
            Self::CategoryInUse { category_id, tools } => {
                warn!(category_id, tools, "Refusing to delete category still in use")
            }
            Self::Timeout(limit) => error!(?limit, "Request timed out"),
            Self::BadRequest(message) => warn!("Bad request: {message}"),
        }

        View::with_status(self.status(), views::ERROR, context! { error => self.to_string() })
            .into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
