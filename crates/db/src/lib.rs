//! `db` crate — pure persistence layer.
//!
//! Provides the environment-derived configuration, a connection pool, plain
//! records, and repository functions for the `categories` and `tools`
//! tables.  The only rule enforced above plain SQL is left to callers: the
//! category delete guard is composed by the HTTP layer from
//! [`repository::categories::count_tools_in_category`] and
//! [`repository::categories::delete_category`].

pub mod config;
pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ConfigError, DatabaseConfig};
pub use error::DbError;
pub use models::{Category, CategoryInput, Tool, ToolInput};
pub use pool::{DbConn, DbPool};
