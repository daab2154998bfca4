//! Repository functions — one function per database operation.
//!
//! Every function takes a checked-out `&mut AnyConnection` so a handler can
//! run its whole unit of work on one connection, and returns a
//! `Result<T, DbError>`.  Statements are always parameterized with `?`.

pub mod categories;
pub mod tools;

use sqlx::any::{AnyQueryResult, AnyRow};
use sqlx::{AnyConnection, Row};
use tracing::warn;

use crate::DbError;

/// Decode every row independently, dropping (and logging) rows that fail.
///
/// A single malformed row must not blank an entire listing page.
pub(crate) fn decode_each<T>(
    rows: &[AnyRow],
    table: &str,
    decode: impl Fn(&AnyRow) -> Result<T, sqlx::Error>,
) -> Vec<T> {
    rows.iter()
        .filter_map(|row| match decode(row) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping undecodable {table} row: {e}");
                None
            }
        })
        .collect()
}

/// Read a text column, accepting values the driver reports as bytes.
///
/// MySQL `TEXT` columns reach the `Any` driver as blobs; those are decoded
/// as UTF-8.  `NULL` and invalid UTF-8 are still errors.
pub(crate) fn text(row: &AnyRow, column: &str) -> Result<String, sqlx::Error> {
    match row.try_get::<String, _>(column) {
        Ok(value) => Ok(value),
        Err(text_err) => match row.try_get::<Vec<u8>, _>(column) {
            Ok(bytes) => String::from_utf8(bytes).map_err(|e| sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            }),
            Err(_) => Err(text_err),
        },
    }
}

/// The id generated by the insert that produced `result`.
///
/// Drivers that do not report it through `Any` are asked on the same
/// connection.
pub(crate) async fn generated_id(
    conn: &mut AnyConnection,
    result: &AnyQueryResult,
) -> Result<Option<i64>, DbError> {
    if let Some(id) = result.last_insert_id() {
        return Ok(Some(id));
    }

    let backend = conn.backend_name().to_ascii_lowercase();
    let sql = match backend.as_str() {
        "sqlite" => "SELECT last_insert_rowid()",
        "mysql" => "SELECT CAST(LAST_INSERT_ID() AS SIGNED)",
        _ => return Ok(None),
    };
    let id: i64 = sqlx::query_scalar(sql).fetch_one(&mut *conn).await?;
    Ok(Some(id))
}
