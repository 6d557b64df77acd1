//! Menu endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{NaiveDate, Utc};
use lunchvote_common::AppResult;
use lunchvote_core::{PublishMenuInput, UpdateMenuInput};
use lunchvote_db::entities::{menu, restaurant};
use serde::{Deserialize, Serialize};

use super::restaurants::RestaurantResponse;
use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Menu response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResponse {
    pub id: String,
    pub restaurant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantResponse>,
    pub description: String,
    pub upload_date: NaiveDate,
    pub vote_count: i32,
    pub created_at: String,
}

impl MenuResponse {
    pub fn new(menu: menu::Model, restaurant: Option<restaurant::Model>) -> Self {
        Self {
            id: menu.id,
            restaurant_id: menu.restaurant_id,
            restaurant: restaurant.map(Into::into),
            description: menu.description,
            upload_date: menu.upload_date,
            vote_count: menu.vote_count,
            created_at: menu.created_at.to_rfc3339(),
        }
    }
}

impl From<menu::Model> for MenuResponse {
    fn from(menu: menu::Model) -> Self {
        Self::new(menu, None)
    }
}

/// Menu list query.
#[derive(Debug, Deserialize)]
pub struct ListMenusQuery {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
}

/// List a day's menus, most voted first.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListMenusQuery>,
) -> AppResult<ApiResponse<Vec<MenuResponse>>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let menus = state.menu_service.list_by_date(date).await?;

    Ok(ApiResponse::ok(
        menus
            .into_iter()
            .map(|(menu, restaurant)| MenuResponse::new(menu, restaurant))
            .collect(),
    ))
}

/// Publish a menu for one of the caller's restaurants.
async fn publish(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<PublishMenuInput>,
) -> AppResult<ApiResponse<MenuResponse>> {
    let menu = state.menu_service.publish(&user, input).await?;
    Ok(ApiResponse::ok(menu.into()))
}

/// Show a menu with its restaurant.
async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<MenuResponse>> {
    let (menu, restaurant) = state.menu_service.get(&id).await?;
    Ok(ApiResponse::ok(MenuResponse::new(menu, restaurant)))
}

/// Update a menu's description.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateMenuInput>,
) -> AppResult<ApiResponse<MenuResponse>> {
    let menu = state.menu_service.update(&user, &id, input).await?;
    Ok(ApiResponse::ok(menu.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(publish))
        .route("/{id}", get(show).patch(update))
}
