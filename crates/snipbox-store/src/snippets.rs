//! Snippet queries over a single connection.
//!
//! Every function takes the caller's connection so a request can run all of
//! its statements on the one handle held by its [`RequestDb`](crate::RequestDb).

use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::debug;

use crate::error::StoreResult;
use crate::schema::SNIPPET_COLUMNS;
use crate::types::{Snippet, SnippetId};

fn snippet_from_row(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get("id")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

/// All snippets, newest first. Rows sharing a timestamp are ordered by id so
/// later inserts still come first.
pub fn list_snippets(conn: &Connection) -> StoreResult<Vec<Snippet>> {
    let sql = format!("SELECT {SNIPPET_COLUMNS} FROM snippets ORDER BY created_at DESC, id DESC");
    let mut stmt = conn.prepare_cached(&sql).map_err(map_err!(Query))?;
    let rows = stmt
        .query_map([], snippet_from_row)
        .map_err(map_err!(Query))?;
    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(map_err!(Query))?);
    }
    Ok(results)
}

/// A single snippet by id.
pub fn get_snippet(conn: &Connection, id: SnippetId) -> StoreResult<Option<Snippet>> {
    let sql = format!("SELECT {SNIPPET_COLUMNS} FROM snippets WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql).map_err(map_err!(Query))?;
    let snippet = stmt
        .query_row(params![id], snippet_from_row)
        .optional()
        .map_err(map_err!(Query))?;
    Ok(snippet)
}

/// Insert a snippet and return the id the store assigned to it.
pub fn create_snippet(conn: &Connection, content: &str) -> StoreResult<SnippetId> {
    conn.execute("INSERT INTO snippets (content) VALUES (?1)", params![content])
        .map_err(map_err!(Write))?;
    let id = conn.last_insert_rowid();
    debug!(id, bytes = content.len(), "snippet stored");
    Ok(id)
}

/// Number of stored snippets.
pub fn count_snippets(conn: &Connection) -> StoreResult<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))
        .map_err(map_err!(Query))?;
    Ok(count as u64)
}
