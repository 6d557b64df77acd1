//! Vote service.
//!
//! Every vote write is one transaction: the vote row, the tally change in
//! the [`VoteLedger`] and a shared lock on the day's result row. Holding
//! that lock means a day cannot be finalized while a vote for it is in
//! flight, and a vote that arrives after finalization sees the closed day.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use lunchvote_common::{AppError, AppResult, IdGenerator};
use lunchvote_db::{
    entities::{user, user::UserRole, vote},
    repositories::{DailyResultRepository, MenuRepository, RowLock, VoteRepository},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, Set, TransactionTrait};
use serde::Deserialize;

use super::vote_ledger::VoteLedger;

/// Input for casting a vote.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteInput {
    pub menu_id: String,
    pub voting_date: NaiveDate,
}

/// Input for changing a vote. The voting date may be repeated but never
/// changed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeVoteInput {
    pub menu_id: String,
    pub voting_date: Option<NaiveDate>,
}

/// Vote service for business logic.
#[derive(Clone)]
pub struct VoteService {
    db: Arc<DatabaseConnection>,
    vote_repo: VoteRepository,
    menu_repo: MenuRepository,
    result_repo: DailyResultRepository,
    ledger: VoteLedger,
    id_gen: IdGenerator,
}

impl VoteService {
    /// Create a new vote service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        vote_repo: VoteRepository,
        menu_repo: MenuRepository,
        result_repo: DailyResultRepository,
        ledger: VoteLedger,
    ) -> Self {
        Self {
            db,
            vote_repo,
            menu_repo,
            result_repo,
            ledger,
            id_gen: IdGenerator::new(),
        }
    }

    /// Cast the employee's vote for the day.
    pub async fn cast(&self, employee: &user::Model, input: CastVoteInput) -> AppResult<vote::Model> {
        if employee.role != UserRole::Employee {
            return Err(AppError::Forbidden("Only employees can vote".to_string()));
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        self.ensure_open(&txn, input.voting_date).await?;

        let menu = self.menu_repo.get_by_id_in(&txn, &input.menu_id).await?;
        if menu.upload_date != input.voting_date {
            return Err(policy_violation(
                "Voting date and menu upload date must be the same",
            ));
        }

        let now = Utc::now();
        let model = vote::ActiveModel {
            id: Set(self.id_gen.generate()),
            employee_id: Set(employee.id.clone()),
            menu_id: Set(menu.id),
            voting_date: Set(input.voting_date),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let vote = self.vote_repo.create(&txn, model).await?;
        self.ledger.on_vote_created(&txn, &vote).await?;

        txn.commit().await.map_err(db_error)?;

        tracing::debug!(vote_id = %vote.id, menu_id = %vote.menu_id, "Vote cast");
        Ok(vote)
    }

    /// Move the employee's vote to another menu of the same day.
    pub async fn change(
        &self,
        employee: &user::Model,
        id: &str,
        input: ChangeVoteInput,
    ) -> AppResult<vote::Model> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let vote = self.own_vote(&txn, employee, id).await?;
        self.ensure_open(&txn, vote.voting_date).await?;

        if input.voting_date.is_some_and(|date| date != vote.voting_date) {
            return Err(policy_violation("You cannot change the voting date"));
        }

        let menu = self.menu_repo.get_by_id_in(&txn, &input.menu_id).await?;
        if menu.upload_date != vote.voting_date {
            return Err(policy_violation(
                "Voting date and menu upload date must be the same",
            ));
        }

        if menu.id == vote.menu_id {
            txn.commit().await.map_err(db_error)?;
            return Ok(vote);
        }

        let old_menu_id = vote.menu_id.clone();
        let vote = self.vote_repo.update_menu(&txn, vote, &menu.id).await?;
        self.ledger
            .on_vote_menu_changed(&txn, &vote, &old_menu_id, &menu.id)
            .await?;

        txn.commit().await.map_err(db_error)?;

        tracing::debug!(vote_id = %vote.id, from = %old_menu_id, to = %vote.menu_id, "Vote changed");
        Ok(vote)
    }

    /// Withdraw the employee's vote.
    pub async fn retract(&self, employee: &user::Model, id: &str) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let vote = self.own_vote(&txn, employee, id).await?;
        self.ensure_open(&txn, vote.voting_date).await?;

        self.vote_repo.delete(&txn, &vote.id).await?;
        self.ledger.on_vote_deleted(&txn, &vote).await?;

        txn.commit().await.map_err(db_error)?;

        tracing::debug!(vote_id = %vote.id, "Vote retracted");
        Ok(())
    }

    /// List the employee's votes, newest day first.
    pub async fn list_mine(&self, employee: &user::Model) -> AppResult<Vec<vote::Model>> {
        self.vote_repo.find_by_employee(&employee.id).await
    }

    /// Take the shared lock on the day's result and reject closed days.
    async fn ensure_open(&self, txn: &DatabaseTransaction, day: NaiveDate) -> AppResult<()> {
        let result = self
            .result_repo
            .find_or_insert(txn, self.id_gen.generate(), day, RowLock::Shared)
            .await?;

        if result.finalized {
            tracing::warn!(voting_date = %day, "Vote rejected: voting is closed");
            return Err(AppError::VotingClosed(format!(
                "Voting is stopped for {day}"
            )));
        }
        Ok(())
    }

    async fn own_vote(
        &self,
        txn: &DatabaseTransaction,
        employee: &user::Model,
        id: &str,
    ) -> AppResult<vote::Model> {
        let vote = self.vote_repo.get_by_id_in(txn, id).await?;
        if vote.employee_id != employee.id {
            return Err(AppError::Forbidden(
                "You can only modify your own vote".to_string(),
            ));
        }
        Ok(vote)
    }
}

fn policy_violation(message: &str) -> AppError {
    tracing::warn!(reason = message, "Vote rejected");
    AppError::PolicyViolation(message.to_string())
}

fn db_error(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}
