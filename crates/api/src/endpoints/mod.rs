//! API endpoints.

mod menus;
mod restaurants;
mod results;
mod users;
mod votes;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/restaurants", restaurants::router())
        .nest("/menus", menus::router())
        .nest("/votes", votes::router())
        .nest("/results", results::router())
}
