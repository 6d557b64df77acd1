//! Restaurant endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use lunchvote_common::AppResult;
use lunchvote_core::{CreateRestaurantInput, UpdateRestaurantInput};
use lunchvote_db::entities::restaurant;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{self, ApiResponse},
};

/// Restaurant response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub address: String,
    pub contact_no: String,
    pub winning_streak: i32,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(r: restaurant::Model) -> Self {
        Self {
            id: r.id,
            owner_id: r.owner_id,
            name: r.name,
            address: r.address,
            contact_no: r.contact_no,
            winning_streak: r.winning_streak,
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// List restaurants.
async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<RestaurantResponse>>> {
    let restaurants = state.restaurant_service.list().await?;
    Ok(ApiResponse::ok(
        restaurants.into_iter().map(Into::into).collect(),
    ))
}

/// Register a restaurant owned by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRestaurantInput>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.create(&user, input).await?;
    Ok(ApiResponse::ok(restaurant.into()))
}

/// Show a restaurant.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.get(&id).await?;
    Ok(ApiResponse::ok(restaurant.into()))
}

/// Update a restaurant's details.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRestaurantInput>,
) -> AppResult<ApiResponse<RestaurantResponse>> {
    let restaurant = state.restaurant_service.update(&user, &id, input).await?;
    Ok(ApiResponse::ok(restaurant.into()))
}

/// Delete a restaurant.
async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state.restaurant_service.delete(&user, &id).await?;
    Ok(response::ok())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).patch(update).delete(delete))
}
