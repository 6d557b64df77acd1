//! Menu repository.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::entities::{Menu, Restaurant, menu, restaurant};
use lunchvote_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, sea_query::Expr,
};

use super::write_error;

/// Menu repository for database operations.
#[derive(Clone)]
pub struct MenuRepository {
    db: Arc<DatabaseConnection>,
}

impl MenuRepository {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a menu by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<menu::Model>> {
        self.find_by_id_in(self.db.as_ref(), id).await
    }

    /// Find a menu by ID on the given connection or transaction.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<menu::Model>> {
        Menu::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a menu by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<menu::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu not found: {id}")))
    }

    /// Get a menu by ID inside a transaction, returning error if not found.
    pub async fn get_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<menu::Model> {
        self.find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Menu not found: {id}")))
    }

    /// Find a menu together with its restaurant.
    pub async fn find_with_restaurant(
        &self,
        id: &str,
    ) -> AppResult<Option<(menu::Model, Option<restaurant::Model>)>> {
        Menu::find_by_id(id)
            .find_also_related(Restaurant)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a day's menus with their restaurants, ranked as for resolution.
    pub async fn find_by_date(
        &self,
        upload_date: NaiveDate,
    ) -> AppResult<Vec<(menu::Model, Option<restaurant::Model>)>> {
        self.find_ranked_by_date(self.db.as_ref(), upload_date).await
    }

    /// Load a day's menus with their restaurants, ranked by vote count
    /// (descending) and then by menu ID (ascending).
    pub async fn find_ranked_by_date<C: ConnectionTrait>(
        &self,
        conn: &C,
        upload_date: NaiveDate,
    ) -> AppResult<Vec<(menu::Model, Option<restaurant::Model>)>> {
        Menu::find()
            .filter(menu::Column::UploadDate.eq(upload_date))
            .find_also_related(Restaurant)
            .order_by_desc(menu::Column::VoteCount)
            .order_by_asc(menu::Column::Id)
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new menu.
    pub async fn create(&self, model: menu::ActiveModel) -> AppResult<menu::Model> {
        self.create_in(self.db.as_ref(), model).await
    }

    /// Create a new menu on the given connection or transaction.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: menu::ActiveModel,
    ) -> AppResult<menu::Model> {
        let upload_date = model.upload_date.clone().take();
        model.insert(conn).await.map_err(|e| {
            write_error(e, || match upload_date {
                Some(date) => format!("A menu for {date} has already been published"),
                None => "A menu for this day has already been published".to_string(),
            })
        })
    }

    /// Update a menu.
    pub async fn update(&self, model: menu::ActiveModel) -> AppResult<menu::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add one vote to a menu's tally as a single atomic statement.
    pub async fn increment_vote_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        let result = Menu::update_many()
            .col_expr(
                menu::Column::VoteCount,
                Expr::col(menu::Column::VoteCount).add(1),
            )
            .filter(menu::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Menu not found: {id}")));
        }
        Ok(())
    }

    /// Remove one vote from a menu's tally as a single atomic statement.
    ///
    /// The update only matches while the tally is positive. If nothing
    /// matched but the menu exists, the tally would have gone negative and
    /// an [`AppError::InvariantViolation`] is returned.
    pub async fn decrement_vote_count<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<()> {
        let result = Menu::update_many()
            .col_expr(
                menu::Column::VoteCount,
                Expr::col(menu::Column::VoteCount).sub(1),
            )
            .filter(menu::Column::Id.eq(id))
            .filter(menu::Column::VoteCount.gt(0))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected > 0 {
            return Ok(());
        }

        match self.find_by_id_in(conn, id).await? {
            Some(_) => Err(AppError::InvariantViolation(format!(
                "vote count of menu {id} would become negative"
            ))),
            None => Err(AppError::NotFound(format!("Menu not found: {id}"))),
        }
    }
}
