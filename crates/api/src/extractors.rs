//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use lunchvote_common::AppError;
use lunchvote_db::entities::user;

/// The acting user, resolved from the `X-User-Id` header by
/// [`identity_middleware`](crate::middleware::identity_middleware).
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
