//! Restaurant repository.

use std::sync::Arc;

use crate::entities::{Restaurant, restaurant};
use lunchvote_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

use super::write_error;

/// Restaurant repository for database operations.
#[derive(Clone)]
pub struct RestaurantRepository {
    db: Arc<DatabaseConnection>,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a restaurant by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<restaurant::Model>> {
        Restaurant::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a restaurant by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<restaurant::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Restaurant not found: {id}")))
    }

    /// List all restaurants, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .order_by_asc(restaurant::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the restaurants of one owner.
    pub async fn find_by_owner(&self, owner_id: &str) -> AppResult<Vec<restaurant::Model>> {
        Restaurant::find()
            .filter(restaurant::Column::OwnerId.eq(owner_id))
            .order_by_asc(restaurant::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new restaurant.
    pub async fn create(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a restaurant.
    pub async fn update(&self, model: restaurant::ActiveModel) -> AppResult<restaurant::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a restaurant (its menus and their votes cascade).
    ///
    /// A menu named by a daily result blocks the delete with
    /// [`AppError::ConstraintViolation`].
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Restaurant::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| {
                write_error(e, || {
                    format!("Restaurant {id} has a menu named by a daily result")
                })
            })?;

        Ok(())
    }

    /// Increment the winning streak atomically.
    pub async fn increment_winning_streak<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        let result = Restaurant::update_many()
            .col_expr(
                restaurant::Column::WinningStreak,
                Expr::col(restaurant::Column::WinningStreak).add(1),
            )
            .filter(restaurant::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Restaurant not found: {id}")));
        }
        Ok(())
    }

    /// Reset the winning streak to zero.
    pub async fn reset_winning_streak<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        let result = Restaurant::update_many()
            .col_expr(restaurant::Column::WinningStreak, Expr::value(0))
            .filter(restaurant::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Restaurant not found: {id}")));
        }
        Ok(())
    }
}
