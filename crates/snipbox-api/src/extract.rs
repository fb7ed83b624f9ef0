//! Request extractors.

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use snipbox_store::{RequestDb, Store};

/// The request's database context.
///
/// Built when the handler is entered and dropped when it returns, which
/// closes any connection the handler opened.
pub struct Db(pub RequestDb);

impl<S> FromRequestParts<S> for Db
where
    Store: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Db(Store::from_ref(state).request()))
    }
}

impl Deref for Db {
    type Target = RequestDb;

    fn deref(&self) -> &RequestDb {
        &self.0
    }
}

impl DerefMut for Db {
    fn deref_mut(&mut self) -> &mut RequestDb {
        &mut self.0
    }
}
