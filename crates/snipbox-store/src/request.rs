//! Request-scoped connection context.
//!
//! A `RequestDb` is created when a request starts and dropped when it ends.
//! It opens at most one connection, lazily, and closes it on drop whether
//! the request succeeded or not.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::StoreResult;
use crate::store::Store;

/// Per-request holder of an optional store connection.
#[derive(Debug)]
pub struct RequestDb {
    store: Store,
    conn: Option<Connection>,
}

impl RequestDb {
    pub fn new(store: Store) -> Self {
        Self { store, conn: None }
    }

    /// The request's connection, opened on first call and reused after.
    pub fn get_connection(&mut self) -> StoreResult<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                let conn = self.store.connect()?;
                debug!(store = %self.store, "request connection opened");
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Whether a connection has been opened and not yet closed.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Close the connection if one was opened. A failed close is logged and
    /// the handle is dropped anyway.
    pub fn close_if_open(&mut self) {
        if let Some(conn) = self.conn.take() {
            match conn.close() {
                Ok(()) => debug!(store = %self.store, "request connection closed"),
                Err((_conn, e)) => warn!(error = %e, "failed to close request connection"),
            }
        }
    }
}

impl Drop for RequestDb {
    fn drop(&mut self) {
        self.close_if_open();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippets;

    #[test]
    fn connection_is_lazy() {
        let store = Store::open_in_memory().unwrap();
        let db = store.request();
        assert!(!db.is_open());
    }

    #[test]
    fn connection_is_reused_within_request() {
        let store = Store::open_in_memory().unwrap();
        let mut db = store.request();

        let first = db.get_connection().unwrap() as *const Connection;
        let second = db.get_connection().unwrap() as *const Connection;
        assert_eq!(first, second);
        assert!(db.is_open());
    }

    #[test]
    fn close_if_open_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        let mut db = store.request();

        db.close_if_open();
        assert!(!db.is_open());

        db.get_connection().unwrap();
        db.close_if_open();
        assert!(!db.is_open());
        db.close_if_open();
    }

    #[test]
    fn reopens_after_close() {
        let store = Store::open_in_memory().unwrap();
        let mut db = store.request();
        snippets::create_snippet(db.get_connection().unwrap(), "first").unwrap();
        db.close_if_open();

        let conn = db.get_connection().unwrap();
        assert_eq!(snippets::count_snippets(conn).unwrap(), 1);
    }

    #[test]
    fn open_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // SQLite does not create missing parent directories.
        let store = Store::new(dir.path().join("missing/snippets.db"));
        let mut db = store.request();

        assert!(db.get_connection().is_err());
        assert!(!db.is_open());
    }

    #[test]
    fn writes_are_visible_to_later_requests() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("snippets.db"));
        store.init_schema().unwrap();

        let id = {
            let mut db = store.request();
            snippets::create_snippet(db.get_connection().unwrap(), "durable").unwrap()
        };

        let mut db = store.request();
        let snippet = snippets::get_snippet(db.get_connection().unwrap(), id)
            .unwrap()
            .unwrap();
        assert_eq!(snippet.content, "durable");
    }
}
