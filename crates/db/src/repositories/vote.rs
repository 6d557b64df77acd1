//! Vote repository.

use std::sync::Arc;

use chrono::Utc;

use crate::entities::{Vote, vote};
use lunchvote_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use super::write_error;

/// Vote repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a vote by ID on the given connection or transaction.
    pub async fn find_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<vote::Model>> {
        Vote::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a vote by ID inside a transaction, returning error if not found.
    pub async fn get_by_id_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<vote::Model> {
        self.find_by_id_in(conn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vote not found: {id}")))
    }

    /// List an employee's votes, newest day first.
    pub async fn find_by_employee(&self, employee_id: &str) -> AppResult<Vec<vote::Model>> {
        Vote::find()
            .filter(vote::Column::EmployeeId.eq(employee_id))
            .order_by_desc(vote::Column::VotingDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the live votes that point at a menu.
    pub async fn count_by_menu(&self, menu_id: &str) -> AppResult<u64> {
        Vote::find()
            .filter(vote::Column::MenuId.eq(menu_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a vote. A second vote by the same employee for the same day
    /// is rejected with [`AppError::ConstraintViolation`].
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: vote::ActiveModel,
    ) -> AppResult<vote::Model> {
        let voting_date = model.voting_date.clone().take();
        model.insert(conn).await.map_err(|e| {
            write_error(e, || match voting_date {
                Some(date) => format!("You have already voted for {date}"),
                None => "You have already voted for this day".to_string(),
            })
        })
    }

    /// Point an existing vote at another menu. The voting date is never touched.
    pub async fn update_menu<C: ConnectionTrait>(
        &self,
        conn: &C,
        vote: vote::Model,
        menu_id: &str,
    ) -> AppResult<vote::Model> {
        let mut active: vote::ActiveModel = vote.into();
        active.menu_id = Set(menu_id.to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        active
            .update(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a vote.
    pub async fn delete<C: ConnectionTrait>(&self, conn: &C, id: &str) -> AppResult<()> {
        let result = Vote::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Vote not found: {id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_vote(id: &str, employee_id: &str, menu_id: &str) -> vote::Model {
        vote::Model {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            menu_id: menu_id.to_string(),
            voting_date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_employee() {
        let v1 = create_test_vote("v1", "e1", "m1");
        let v2 = create_test_vote("v2", "e1", "m2");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[v1, v2]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let result = repo.find_by_employee("e1").await.unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_update_menu_keeps_date() {
        let vote = create_test_vote("v1", "e1", "m1");
        let mut moved = vote.clone();
        moved.menu_id = "m2".to_string();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[moved.clone()]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db.clone());
        let result = repo.update_menu(db.as_ref(), vote.clone(), "m2").await.unwrap();

        assert_eq!(result.menu_id, "m2");
        assert_eq!(result.voting_date, vote.voting_date);
    }

    #[tokio::test]
    async fn test_delete_missing_vote() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = VoteRepository::new(db.clone());
        let result = repo.delete(db.as_ref(), "missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
