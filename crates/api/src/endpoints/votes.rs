//! Vote endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::NaiveDate;
use lunchvote_common::AppResult;
use lunchvote_core::{CastVoteInput, ChangeVoteInput};
use lunchvote_db::entities::vote;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Vote response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub id: String,
    pub menu_id: String,
    pub voting_date: NaiveDate,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<vote::Model> for VoteResponse {
    fn from(vote: vote::Model) -> Self {
        Self {
            id: vote.id,
            menu_id: vote.menu_id,
            voting_date: vote.voting_date,
            created_at: vote.created_at.to_rfc3339(),
            updated_at: vote.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List the caller's votes.
async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<VoteResponse>>> {
    let votes = state.vote_service.list_mine(&user).await?;
    Ok(ApiResponse::ok(votes.into_iter().map(Into::into).collect()))
}

/// Cast a vote.
async fn cast(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CastVoteInput>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let vote = state.vote_service.cast(&user, input).await?;
    Ok(ApiResponse::ok(vote.into()))
}

/// Move a vote to another menu of the same day.
async fn change(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChangeVoteInput>,
) -> AppResult<ApiResponse<VoteResponse>> {
    let vote = state.vote_service.change(&user, &id, input).await?;
    Ok(ApiResponse::ok(vote.into()))
}

/// Withdraw a vote.
async fn retract(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.vote_service.retract(&user, &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(cast))
        .route("/{id}", patch(change).delete(retract))
}
