//! REST API handlers.
//!
//! Each handler runs its queries on the request's own connection (see
//! [`Db`]) and returns JSON. Error bodies always carry a single `error`
//! string.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use snipbox_store::{StoreError, snippets};
use tracing::{debug, error};

use crate::assets::{self, StaticAssets};
use crate::extract::Db;

const MISSING_CONTENT: &str = "Missing content";
const CONTENT_NOT_STRING: &str = "Content must be a string";
const NOT_FOUND: &str = "Snippet not found";

/// Error body shared by every failure response.
#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Body returned by a successful create.
#[derive(serde::Serialize)]
struct Created {
    id: i64,
    message: &'static str,
}

fn error_response(msg: &str, status: StatusCode) -> Response {
    (status, Json(ErrorBody { error: msg })).into_response()
}

fn store_failure(e: StoreError) -> Response {
    error!(error = %e, "store operation failed");
    error_response(&e.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
}

// ── Snippets ───────────────────────────────────────────────────

/// GET /api/snippets
pub async fn list_snippets(mut db: Db) -> Response {
    match db.get_connection().and_then(snippets::list_snippets) {
        Ok(all) => Json(all).into_response(),
        Err(e) => store_failure(e),
    }
}

/// GET /api/snippets/{id}
///
/// Ids that are not plain decimal integers do not match this route; they get
/// the same treatment as any other unmatched path.
pub async fn get_snippet(
    State(assets): State<StaticAssets>,
    mut db: Db,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        debug!(%raw_id, "non-numeric snippet id, serving entry file");
        return assets::serve_entry(&assets).await;
    };

    let conn = match db.get_connection() {
        Ok(conn) => conn,
        Err(e) => return store_failure(e),
    };
    match snippets::get_snippet(conn, id) {
        Ok(Some(snippet)) => Json(snippet).into_response(),
        Ok(None) => error_response(NOT_FOUND, StatusCode::NOT_FOUND),
        Err(e) => store_failure(e),
    }
}

/// POST /api/snippets
///
/// The body is read as JSON whatever its declared content type.
pub async fn create_snippet(mut db: Db, body: Bytes) -> Response {
    let content = match parse_content(&body) {
        Ok(content) => content,
        Err(msg) => return error_response(msg, StatusCode::BAD_REQUEST),
    };

    let conn = match db.get_connection() {
        Ok(conn) => conn,
        Err(e) => return store_failure(e),
    };
    match snippets::create_snippet(conn, &content) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(Created {
                id,
                message: "Snippet created successfully",
            }),
        )
            .into_response(),
        Err(e) => store_failure(e),
    }
}

// ── Health ─────────────────────────────────────────────────────

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Accept only unsigned decimal digits, as the route's integer converter.
fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Pull a string `content` field out of a JSON object body.
fn parse_content(body: &[u8]) -> Result<String, &'static str> {
    let value: Value = serde_json::from_slice(body).map_err(|_| MISSING_CONTENT)?;
    match value.get("content") {
        Some(Value::String(content)) => Ok(content.clone()),
        Some(_) => Err(CONTENT_NOT_STRING),
        None => Err(MISSING_CONTENT),
    }
}
