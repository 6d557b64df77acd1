//! API middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use lunchvote_common::Config;
use lunchvote_core::{
    DailyResultResolver, MenuService, RestaurantService, UserService, VoteLedger, VoteService,
};
use lunchvote_db::repositories::{
    DailyResultRepository, MenuRepository, RestaurantRepository, UserRepository, VoteRepository,
};
use sea_orm::DatabaseConnection;

/// Header naming the acting user. Identity is asserted upstream.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub restaurant_service: RestaurantService,
    pub menu_service: MenuService,
    pub vote_service: VoteService,
    pub result_resolver: DailyResultResolver,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let restaurant_repo = RestaurantRepository::new(Arc::clone(&db));
        let menu_repo = MenuRepository::new(Arc::clone(&db));
        let vote_repo = VoteRepository::new(Arc::clone(&db));
        let result_repo = DailyResultRepository::new(Arc::clone(&db));

        let ledger = VoteLedger::new(menu_repo.clone());

        Self {
            user_service: UserService::new(user_repo),
            restaurant_service: RestaurantService::new(
                restaurant_repo.clone(),
                result_repo.clone(),
            ),
            menu_service: MenuService::new(
                Arc::clone(&db),
                menu_repo.clone(),
                restaurant_repo.clone(),
                result_repo.clone(),
            ),
            vote_service: VoteService::new(
                Arc::clone(&db),
                vote_repo,
                menu_repo.clone(),
                result_repo.clone(),
                ledger,
            ),
            result_resolver: DailyResultResolver::new(
                db,
                result_repo,
                menu_repo,
                restaurant_repo,
                &config.voting,
            ),
        }
    }
}

/// Identity middleware.
///
/// Looks up the user named by the `X-User-Id` header and stores it in the
/// request extensions for [`AuthUser`](crate::extractors::AuthUser).
/// Unknown IDs leave the request anonymous.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    if let Some(user_id) = user_id {
        match state.user_service.find(&user_id).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => tracing::debug!(user_id = %user_id, "Unknown user in identity header"),
            Err(e) => tracing::warn!(error = %e, "Failed to resolve acting user"),
        }
    }

    next.run(req).await
}
