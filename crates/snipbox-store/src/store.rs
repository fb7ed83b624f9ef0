//! Store — names the SQLite database and opens connections to it.
//!
//! The store supports both on-disk and in-memory backends (the latter for
//! testing). An in-memory store keeps one anchor connection alive so the
//! shared-cache database survives the per-request connection churn.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::request::RequestDb;
use crate::schema::INIT_SCRIPT;

/// How long a connection waits on SQLite's write lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    /// Shared-cache URI, unique per store.
    Memory(String),
}

/// Handle to the snippet database. Cheap to clone; holds no request state.
#[derive(Debug, Clone)]
pub struct Store {
    location: Location,
    _anchor: Option<Arc<Mutex<Connection>>>,
}

impl Store {
    /// Name the database file at `path`. Nothing is opened until a
    /// connection is requested.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            _anchor: None,
        }
    }

    /// Create an ephemeral in-memory store with the schema already applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
        let uri = format!(
            "file:snipbox-mem-{}-{seq}?mode=memory&cache=shared",
            std::process::id()
        );
        let anchor = Connection::open(&uri).map_err(map_err!(Open))?;
        let store = Self {
            location: Location::Memory(uri),
            _anchor: Some(Arc::new(Mutex::new(anchor))),
        };
        store.init_schema()?;
        debug!("in-memory store opened");
        Ok(store)
    }

    /// Backing file, or `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory(_) => None,
        }
    }

    /// Whether the backing file is present. In-memory stores always exist.
    pub fn exists(&self) -> bool {
        match &self.location {
            Location::File(path) => path.exists(),
            Location::Memory(_) => true,
        }
    }

    /// Open a fresh connection. Callers own it; nothing is pooled.
    pub fn connect(&self) -> StoreResult<Connection> {
        let conn = match &self.location {
            Location::File(path) => Connection::open(path),
            Location::Memory(uri) => Connection::open(uri),
        }
        .map_err(map_err!(Open))?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(map_err!(Open))?;
        Ok(conn)
    }

    /// Start a request-scoped connection context.
    pub fn request(&self) -> RequestDb {
        RequestDb::new(self.clone())
    }

    /// Drop and recreate the `snippets` table.
    pub fn init_schema(&self) -> StoreResult<()> {
        if let Some(parent) = self.path().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(map_err!(Io))?;
            }
        }
        let conn = self.connect()?;
        conn.execute_batch(INIT_SCRIPT).map_err(map_err!(Schema))?;
        info!(location = %self, "initialized the database");
        Ok(())
    }

    /// Delete the backing file. For an in-memory store the table is dropped
    /// instead. Missing files are not an error.
    pub fn destroy(&self) -> StoreResult<()> {
        match &self.location {
            Location::File(path) => match std::fs::remove_file(path) {
                Ok(()) => {
                    debug!(?path, "database file removed");
                    Ok(())
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StoreError::Io(e.to_string())),
            },
            Location::Memory(_) => {
                let conn = self.connect()?;
                conn.execute_batch("DROP TABLE IF EXISTS snippets")
                    .map_err(map_err!(Schema))?;
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Location::File(path) => write!(f, "{}", path.display()),
            Location::Memory(_) => f.write_str(":memory:"),
        }
    }
}
