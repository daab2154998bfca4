//! Route handlers — one per endpoint.
//!
//! Each handler checks out a single connection, runs at most two repository
//! calls on it, and ends in a rendered view, an error view, or a redirect.

pub mod categories;
pub mod tools;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query};
use db::{DbConn, DbPool};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Check out the connection for this request's unit of work.
    pub(crate) async fn connection(&self) -> ApiResult<DbConn> {
        Ok(db::pool::acquire(&self.pool).await?)
    }
}

/// `?id=` on detail, edit and delete routes.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

pub(crate) fn from_query<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub(crate) fn from_form<T>(form: Result<Form<T>, FormRejection>) -> ApiResult<T> {
    form.map(|Form(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}
