//! SQL schema for the snippet store.
//!
//! `created_at` is filled in by SQLite (`CURRENT_TIMESTAMP`, UTC, second
//! resolution) so the server never supplies timestamps itself.

/// Drops and recreates the `snippets` table.
pub const INIT_SCRIPT: &str = "
DROP TABLE IF EXISTS snippets;

CREATE TABLE snippets (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    content    TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
";

/// Column projection shared by every read query.
pub const SNIPPET_COLUMNS: &str = "id, content, created_at";
