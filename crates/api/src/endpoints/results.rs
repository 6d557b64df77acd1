//! Daily result endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use lunchvote_common::{AppError, AppResult};
use lunchvote_db::entities::{daily_result, user::UserRole};
use serde::{Deserialize, Serialize};

use super::menus::MenuResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Daily result response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultResponse {
    pub id: String,
    pub voting_date: NaiveDate,
    pub finalized: bool,
    pub winning_menu_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_menu: Option<MenuResponse>,
}

impl ResultResponse {
    fn new(result: daily_result::Model, winning_menu: Option<MenuResponse>) -> Self {
        Self {
            id: result.id,
            voting_date: result.voting_date,
            finalized: result.finalized,
            winning_menu_id: result.winning_menu_id,
            winning_menu,
        }
    }
}

/// Publish request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub voting_date: NaiveDate,
    pub stop_voting: bool,
}

/// Close voting for a day and publish its winner.
///
/// Responds 204 when the day had no menus.
async fn publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> AppResult<Response> {
    if user.role != UserRole::Admin {
        return Err(AppError::Forbidden(
            "Only admins can publish results".to_string(),
        ));
    }
    if !req.stop_voting {
        return Err(AppError::BadRequest(
            "stopVoting must be true to publish a result".to_string(),
        ));
    }

    let resolution = state.result_resolver.resolve_day(req.voting_date).await?;
    if !resolution.winner_found {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let winning_menu = resolution.winning_menu.map(MenuResponse::from);
    Ok(ApiResponse::ok(ResultResponse::new(resolution.result, winning_menu)).into_response())
}

/// List results, most recent day first.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<ResultResponse>>> {
    let results = state.result_resolver.list_results().await?;
    Ok(ApiResponse::ok(
        results
            .into_iter()
            .map(|r| ResultResponse::new(r, None))
            .collect(),
    ))
}

/// Show the result for a day with its winning menu.
async fn show(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<ApiResponse<ResultResponse>> {
    let result = state.result_resolver.get_result(date).await?;

    let winning_menu = match result.winning_menu_id.as_deref() {
        Some(menu_id) => {
            let (menu, restaurant) = state.menu_service.get(menu_id).await?;
            Some(MenuResponse::new(menu, restaurant))
        }
        None => None,
    };

    Ok(ApiResponse::ok(ResultResponse::new(result, winning_menu)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/publish", post(publish))
        .route("/{date}", get(show))
}
