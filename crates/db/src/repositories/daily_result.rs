//! Daily result repository.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::entities::{DailyResult, daily_result, menu};
use lunchvote_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    sea_query::OnConflict,
};

/// Row lock taken on a day's result while a transaction reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLock {
    /// Vote writers: many may hold it, resolution waits for all of them.
    Shared,
    /// Resolution: exclusive until the transaction ends.
    Exclusive,
}

/// Daily result repository for database operations.
#[derive(Clone)]
pub struct DailyResultRepository {
    db: Arc<DatabaseConnection>,
}

impl DailyResultRepository {
    /// Create a new daily result repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the result for a day.
    pub async fn find_by_date(
        &self,
        voting_date: NaiveDate,
    ) -> AppResult<Option<daily_result::Model>> {
        DailyResult::find()
            .filter(daily_result::Column::VotingDate.eq(voting_date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all results, most recent day first.
    pub async fn find_all(&self) -> AppResult<Vec<daily_result::Model>> {
        DailyResult::find()
            .order_by_desc(daily_result::Column::VotingDate)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether any finalized result names one of the restaurant's menus.
    pub async fn has_win_for_restaurant(&self, restaurant_id: &str) -> AppResult<bool> {
        let wins = DailyResult::find()
            .join(JoinType::InnerJoin, daily_result::Relation::WinningMenu.def())
            .filter(daily_result::Column::Finalized.eq(true))
            .filter(menu::Column::RestaurantId.eq(restaurant_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(wins > 0)
    }

    /// Find the result row for a day, inserting a non-finalized placeholder
    /// first if none exists, and read it back under `lock`.
    ///
    /// The insert is `ON CONFLICT (voting_date) DO NOTHING`, so concurrent
    /// callers for the same day never create two rows.
    pub async fn find_or_insert<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: String,
        voting_date: NaiveDate,
        lock: RowLock,
    ) -> AppResult<daily_result::Model> {
        let placeholder = daily_result::ActiveModel {
            id: Set(id),
            voting_date: Set(voting_date),
            winning_menu_id: Set(None),
            finalized: Set(false),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        DailyResult::insert(placeholder)
            .on_conflict(
                OnConflict::column(daily_result::Column::VotingDate)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let query = DailyResult::find().filter(daily_result::Column::VotingDate.eq(voting_date));

        with_lock(conn.get_database_backend(), query, lock)
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| {
                AppError::InvariantViolation(format!(
                    "result row for {voting_date} vanished after insert"
                ))
            })
    }

    /// Fix the winner and close voting for the day.
    pub async fn finalize<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        winning_menu_id: &str,
    ) -> AppResult<daily_result::Model> {
        let active = daily_result::ActiveModel {
            id: Set(id.to_string()),
            winning_menu_id: Set(Some(winning_menu_id.to_string())),
            finalized: Set(true),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        DailyResult::update(active)
            .filter(daily_result::Column::Finalized.eq(false))
            .exec(conn)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => AppError::InvariantViolation(format!(
                    "result {id} was finalized by another transaction"
                )),
                other => AppError::Database(other.to_string()),
            })
    }
}

/// Apply a row lock where the backend supports one. `SQLite` has no row
/// locks; its writers are already serialized by the database lock.
fn with_lock(
    backend: DatabaseBackend,
    query: Select<DailyResult>,
    lock: RowLock,
) -> Select<DailyResult> {
    if backend == DatabaseBackend::Sqlite {
        return query;
    }
    match lock {
        RowLock::Shared => query.lock_shared(),
        RowLock::Exclusive => query.lock_exclusive(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn create_test_result(id: &str, finalized: bool) -> daily_result::Model {
        daily_result::Model {
            id: id.to_string(),
            voting_date: day(),
            winning_menu_id: finalized.then(|| "m1".to_string()),
            finalized,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_or_insert_returns_existing_row() {
        let existing = create_test_result("res1", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .append_query_results([[existing.clone()]])
                .into_connection(),
        );

        let repo = DailyResultRepository::new(db.clone());
        let result = repo
            .find_or_insert(db.as_ref(), "res2".to_string(), day(), RowLock::Exclusive)
            .await
            .unwrap();

        assert_eq!(result.id, "res1");
        assert!(result.finalized);
    }

    #[tokio::test]
    async fn test_finalize() {
        let finalized = create_test_result("res1", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[finalized]])
                .into_connection(),
        );

        let repo = DailyResultRepository::new(db.clone());
        let result = repo.finalize(db.as_ref(), "res1", "m1").await.unwrap();

        assert!(result.finalized);
        assert_eq!(result.winning_menu_id.as_deref(), Some("m1"));
    }

    #[tokio::test]
    async fn test_has_win_for_restaurant() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = DailyResultRepository::new(db);
        assert!(repo.has_win_for_restaurant("r1").await.unwrap());
    }

    #[test]
    fn test_lock_clause_per_backend() {
        let query = || DailyResult::find().filter(daily_result::Column::VotingDate.eq(day()));

        let pg = with_lock(DatabaseBackend::Postgres, query(), RowLock::Exclusive)
            .build(DatabaseBackend::Postgres)
            .sql;
        assert!(pg.contains("FOR UPDATE"));

        let pg_shared = with_lock(DatabaseBackend::Postgres, query(), RowLock::Shared)
            .build(DatabaseBackend::Postgres)
            .sql;
        assert!(pg_shared.contains("FOR SHARE"));

        let sqlite = with_lock(DatabaseBackend::Sqlite, query(), RowLock::Exclusive)
            .build(DatabaseBackend::Sqlite)
            .sql;
        assert!(!sqlite.contains("FOR UPDATE"));
    }
}
