//! Menu service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use lunchvote_common::{AppError, AppResult, IdGenerator};
use lunchvote_db::{
    entities::{menu, restaurant, user},
    repositories::{DailyResultRepository, MenuRepository, RestaurantRepository, RowLock},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde::Deserialize;

/// Input for publishing a daily menu.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMenuInput {
    pub restaurant_id: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to today.
    pub upload_date: Option<NaiveDate>,
}

/// Input for updating a menu.
///
/// `upload_date` may be repeated but never changed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuInput {
    pub description: Option<String>,
    pub upload_date: Option<NaiveDate>,
}

/// Menu service for business logic.
#[derive(Clone)]
pub struct MenuService {
    db: Arc<DatabaseConnection>,
    menu_repo: MenuRepository,
    restaurant_repo: RestaurantRepository,
    result_repo: DailyResultRepository,
    id_gen: IdGenerator,
}

impl MenuService {
    /// Create a new menu service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        menu_repo: MenuRepository,
        restaurant_repo: RestaurantRepository,
        result_repo: DailyResultRepository,
    ) -> Self {
        Self {
            db,
            menu_repo,
            restaurant_repo,
            result_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Publish a restaurant's menu for a day. One menu per restaurant and day.
    ///
    /// Like a vote, the insert holds a shared lock on the day's result, so
    /// a menu is either seen by the day's resolution or rejected as late.
    pub async fn publish(
        &self,
        owner: &user::Model,
        input: PublishMenuInput,
    ) -> AppResult<menu::Model> {
        let restaurant = self.restaurant_repo.get_by_id(&input.restaurant_id).await?;
        ensure_owner(owner, &restaurant)?;

        let upload_date = input
            .upload_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let model = menu::ActiveModel {
            id: Set(self.id_gen.generate()),
            restaurant_id: Set(restaurant.id),
            description: Set(input.description),
            upload_date: Set(upload_date),
            vote_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let txn = self.db.begin().await.map_err(db_error)?;

        let result = self
            .result_repo
            .find_or_insert(&txn, self.id_gen.generate(), upload_date, RowLock::Shared)
            .await?;
        if result.finalized {
            tracing::warn!(upload_date = %upload_date, "Menu rejected: voting is closed");
            return Err(AppError::VotingClosed(format!(
                "Voting is stopped for {upload_date}"
            )));
        }

        let menu = self.menu_repo.create_in(&txn, model).await?;
        txn.commit().await.map_err(db_error)?;

        tracing::debug!(menu_id = %menu.id, upload_date = %menu.upload_date, "Published menu");
        Ok(menu)
    }

    /// Get a menu with its restaurant.
    pub async fn get(&self, id: &str) -> AppResult<(menu::Model, Option<restaurant::Model>)> {
        self.menu_repo
            .find_with_restaurant(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu not found: {id}")))
    }

    /// List a day's menus, most voted first.
    pub async fn list_by_date(
        &self,
        date: NaiveDate,
    ) -> AppResult<Vec<(menu::Model, Option<restaurant::Model>)>> {
        self.menu_repo.find_by_date(date).await
    }

    /// Update a menu's description.
    pub async fn update(
        &self,
        owner: &user::Model,
        id: &str,
        input: UpdateMenuInput,
    ) -> AppResult<menu::Model> {
        let (menu, restaurant) = self.get(id).await?;
        let restaurant = restaurant.ok_or_else(|| {
            AppError::InvariantViolation(format!("menu {} has no restaurant", menu.id))
        })?;
        ensure_owner(owner, &restaurant)?;

        if input.upload_date.is_some_and(|date| date != menu.upload_date) {
            return Err(AppError::PolicyViolation(
                "You cannot change the upload date of the menu".to_string(),
            ));
        }

        let Some(description) = input.description else {
            return Ok(menu);
        };

        let mut active: menu::ActiveModel = menu.into();
        active.description = Set(description);
        active.updated_at = Set(Some(Utc::now().into()));

        self.menu_repo.update(active).await
    }
}

fn db_error(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}

fn ensure_owner(owner: &user::Model, restaurant: &restaurant::Model) -> AppResult<()> {
    if restaurant.owner_id == owner.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You are not the owner of this restaurant".to_string(),
        ))
    }
}
