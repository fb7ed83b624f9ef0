//! Domain types for the snippet store.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Row identifier assigned by SQLite on insert.
pub type SnippetId = i64;

/// A stored unit of text content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snippet {
    pub id: SnippetId,
    /// Opaque text, stored exactly as submitted.
    pub content: String,
    /// Insert time in UTC, assigned by the store.
    pub created_at: NaiveDateTime,
}
