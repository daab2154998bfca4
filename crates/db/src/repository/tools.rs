//! Tool CRUD operations.

use sqlx::any::AnyRow;
use sqlx::{AnyConnection, Row};
use tracing::debug;

use crate::{
    DbError,
    models::{Category, Tool, ToolInput},
};

use super::{decode_each, generated_id, text};

/// Listing shape: every tool joined with its category, newest first.
const LIST_TOOLS: &str = r#"
    SELECT t.id, t.name, t.category_id, c.name AS category_name,
           t.url, t.rating, t.notes, c.description AS category_description
    FROM tools t
    JOIN categories c ON t.category_id = c.id
    ORDER BY t.id DESC
"#;

/// Show shape: one tool joined with its category name.
const GET_TOOL_WITH_CATEGORY: &str = r#"
    SELECT t.id, t.name, t.category_id, c.name AS category_name,
           t.url, t.rating, t.notes
    FROM tools t
    JOIN categories c ON t.category_id = c.id
    WHERE t.id = ?
"#;

/// Edit shape: the tool's own columns only.
const GET_TOOL: &str = r#"
    SELECT t.id, t.name, t.category_id, t.url, t.rating, t.notes
    FROM tools t
    WHERE t.id = ?
"#;

fn tool_from_row(row: &AnyRow) -> Result<Tool, sqlx::Error> {
    Ok(Tool {
        id: row.try_get("id")?,
        name: text(row, "name")?,
        category_id: row.try_get("category_id")?,
        category: Category::default(),
        url: text(row, "url")?,
        rating: row.try_get("rating")?,
        notes: text(row, "notes")?,
    })
}

fn tool_from_joined_row(row: &AnyRow) -> Result<Tool, sqlx::Error> {
    let mut tool = tool_from_row(row)?;
    tool.category = Category {
        id: tool.category_id,
        name: text(row, "category_name")?,
        description: String::new(),
    };
    Ok(tool)
}

fn tool_from_listing_row(row: &AnyRow) -> Result<Tool, sqlx::Error> {
    let mut tool = tool_from_joined_row(row)?;
    tool.category.description = text(row, "category_description")?;
    Ok(tool)
}

/// Return every tool that has a matching category, newest first.
///
/// Tools whose `category_id` matches no category are not listed.  Rows that
/// fail to decode are skipped.
pub async fn list_tools(conn: &mut AnyConnection) -> Result<Vec<Tool>, DbError> {
    let rows = sqlx::query(LIST_TOOLS).fetch_all(&mut *conn).await?;
    Ok(decode_each(&rows, "tools", tool_from_listing_row))
}

/// Fetch a tool's own columns for the edit form; `category` stays default.
pub async fn get_tool(conn: &mut AnyConnection, id: i64) -> Result<Tool, DbError> {
    let row = sqlx::query(GET_TOOL)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(tool_from_row(&row)?)
}

/// Fetch a tool together with its category name for the detail page.
pub async fn get_tool_with_category(conn: &mut AnyConnection, id: i64) -> Result<Tool, DbError> {
    let row = sqlx::query(GET_TOOL_WITH_CATEGORY)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(DbError::NotFound)?;

    Ok(tool_from_joined_row(&row)?)
}

/// Insert a new tool and return its generated id, when the driver reports
/// one.
///
/// `category_id` is stored as given; it is not checked against
/// `categories`.
pub async fn insert_tool(conn: &mut AnyConnection, input: &ToolInput) -> Result<Option<i64>, DbError> {
    let result = sqlx::query(
        "INSERT INTO tools (name, category_id, url, rating, notes) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&input.name)
    .bind(input.category_id)
    .bind(&input.url)
    .bind(input.rating)
    .bind(&input.notes)
    .execute(&mut *conn)
    .await?;

    let id = generated_id(conn, &result).await?;
    debug!(name = %input.name, ?id, "inserted tool");
    Ok(id)
}

/// Overwrite every editable column of one tool.
///
/// Returns the number of rows affected; an unknown id is not an error.
pub async fn update_tool(conn: &mut AnyConnection, id: i64, input: &ToolInput) -> Result<u64, DbError> {
    let result = sqlx::query(
        "UPDATE tools SET name = ?, category_id = ?, url = ?, rating = ?, notes = ? WHERE id = ?",
    )
    .bind(&input.name)
    .bind(input.category_id)
    .bind(&input.url)
    .bind(input.rating)
    .bind(&input.notes)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Permanently delete a tool by its primary key.
pub async fn delete_tool(conn: &mut AnyConnection, id: i64) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM tools WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}
