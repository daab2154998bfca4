//! In-memory SQLite fixtures for tests.
//!
//! The DDL mirrors `schema/mysql.sql`: no foreign key between `tools` and
//! `categories`, and every column except the names is nullable.

use sqlx::any::AnyPoolOptions;

use crate::{DbError, DbPool};

const CREATE_CATEGORIES: &str = r#"
    CREATE TABLE categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT
    )
"#;

const CREATE_TOOLS: &str = r#"
    CREATE TABLE tools (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER,
        url TEXT,
        rating INTEGER,
        notes TEXT
    )
"#;

/// A single-connection pool over a fresh in-memory database with the
/// schema applied.
///
/// The connection never expires, so the database lives as long as the pool.
pub async fn memory_pool() -> Result<DbPool, DbError> {
    sqlx::any::install_default_drivers();
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(DbError::Unavailable)?;

    sqlx::query(CREATE_CATEGORIES).execute(&pool).await?;
    sqlx::query(CREATE_TOOLS).execute(&pool).await?;
    Ok(pool)
}
