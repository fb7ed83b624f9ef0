//! snipbox-api — HTTP surface for snipbox.
//!
//! Provides axum route handlers for the snippet API and serves the static
//! frontend from the same router.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/snippets` | List all snippets, newest first |
//! | POST | `/api/snippets` | Create a snippet from `{"content": ...}` |
//! | GET | `/api/snippets/{id}` | Get one snippet |
//! | GET | `/health` | Liveness probe |
//! | GET | `/` | Frontend entry file |
//! | * | anything else | Static file, or the entry file for client-side routes |

pub mod assets;
pub mod extract;
pub mod handlers;

use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::get;
use snipbox_store::Store;

pub use assets::StaticAssets;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct ApiState {
    pub store: Store,
    pub assets: StaticAssets,
}

impl FromRef<ApiState> for Store {
    fn from_ref(state: &ApiState) -> Self {
        state.store.clone()
    }
}

impl FromRef<ApiState> for StaticAssets {
    fn from_ref(state: &ApiState) -> Self {
        state.assets.clone()
    }
}

/// Build the complete router (REST API + static frontend).
///
/// The fallback has the lowest priority: it only sees paths no other route
/// claims, including unknown paths under `/api`. Request bodies are not
/// size-capped; snippet content has no length limit.
pub fn build_router(store: Store, assets: StaticAssets) -> Router {
    let state = ApiState { store, assets };

    let api_routes = Router::new()
        .route(
            "/snippets",
            get(handlers::list_snippets).post(handlers::create_snippet),
        )
        .route("/snippets/{id}", get(handlers::get_snippet));

    Router::new()
        .nest("/api", api_routes)
        .route("/", get(assets::index))
        .route("/health", get(handlers::health))
        .fallback(assets::fallback)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
