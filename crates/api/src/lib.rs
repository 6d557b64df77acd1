//! HTTP API layer for lunchvote.
//!
//! - **Endpoints**: users, restaurants, menus, votes and daily results
//! - **Extractors**: the acting user
//! - **Middleware**: application state and identity resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use endpoints::router;
pub use middleware::AppState;

/// The API mounted under `/api`, with identity resolution and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::identity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
