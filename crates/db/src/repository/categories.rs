//! Category CRUD operations.

use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};
use tracing::debug;

use crate::{
    DbError,
    models::{Category, CategoryInput},
};

use super::{decode_each, generated_id, text};

fn category_from_row(row: &AnyRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: text(row, "name")?,
        description: text(row, "description")?,
    })
}

fn category_name_from_row(row: &AnyRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: text(row, "name")?,
        description: String::new(),
    })
}

/// Return every category ordered by name.
///
/// Rows that fail to decode are skipped.
pub async fn list_categories(conn: &mut AnyConnection) -> Result<Vec<Category>, DbError> {
    let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY name")
        .fetch_all(&mut *conn)
        .await?;

    Ok(decode_each(&rows, "categories", category_from_row))
}

/// Return `(id, name)` pairs for the category dropdown, ordered by name.
///
/// `description` is left empty on the returned records.
pub async fn list_category_names(conn: &mut AnyConnection) -> Result<Vec<Category>, DbError> {
    let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name")
        .fetch_all(&mut *conn)
        .await?;

    Ok(decode_each(&rows, "categories", category_name_from_row))
}

/// Fetch a single category by its primary key.
pub async fn get_category(conn: &mut AnyConnection, id: i64) -> Result<Category, DbError> {
    let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(category_from_row(&row)?)
}

/// Insert a new category and return its generated id, when the driver
/// reports one.
pub async fn insert_category(
    conn: &mut AnyConnection,
    input: &CategoryInput,
) -> Result<Option<i64>, DbError> {
    let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
        .bind(&input.name)
        .bind(&input.description)
        .execute(&mut *conn)
        .await?;

    let id = generated_id(conn, &result).await?;
    debug!(name = %input.name, ?id, "inserted category");
    Ok(id)
}

/// Overwrite the name and description of a category.
///
/// Returns the number of rows affected; an unknown id is not an error.
pub async fn update_category(
    conn: &mut AnyConnection,
    id: i64,
    input: &CategoryInput,
) -> Result<u64, DbError> {
    let result = sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
        .bind(&input.name)
        .bind(&input.description)
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Count the tools whose `category_id` points at `id`.
pub async fn count_tools_in_category(conn: &mut AnyConnection, id: i64) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tools WHERE category_id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Delete a category unconditionally.
///
/// Callers must check [`count_tools_in_category`] first; the schema does
/// not stop a referenced category from being removed.
pub async fn delete_category(conn: &mut AnyConnection, id: i64) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
