//! snipbox-store — SQLite-backed snippet storage.
//!
//! # Architecture
//!
//! A single `snippets` table holds every snippet. [`Store`] names the
//! database but never holds a connection itself; each HTTP request gets a
//! [`RequestDb`] that opens one connection on first use and closes it when
//! the request ends.
//!
//! `Store` is `Clone` + `Send` + `Sync` and can be shared across async tasks.

#[macro_use]
pub mod error;
pub mod request;
pub mod schema;
pub mod snippets;
pub mod store;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use request::RequestDb;
pub use store::Store;
pub use types::*;
