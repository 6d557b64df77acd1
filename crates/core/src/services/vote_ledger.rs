//! Vote ledger.
//!
//! Keeps `menu.vote_count` equal to the number of live votes pointing at
//! each menu. Every hook runs on the caller's transaction, so the tally
//! change commits or rolls back together with the vote row itself.

use lunchvote_common::{AppError, AppResult};
use lunchvote_db::{entities::vote, repositories::MenuRepository};
use sea_orm::ConnectionTrait;

/// Applies vote lifecycle events to the per-menu tallies.
#[derive(Clone)]
pub struct VoteLedger {
    menu_repo: MenuRepository,
}

impl VoteLedger {
    /// Create a new vote ledger.
    #[must_use]
    pub const fn new(menu_repo: MenuRepository) -> Self {
        Self { menu_repo }
    }

    /// A vote was inserted: its menu gains one vote.
    pub async fn on_vote_created<C: ConnectionTrait>(
        &self,
        conn: &C,
        vote: &vote::Model,
    ) -> AppResult<()> {
        self.menu_repo
            .increment_vote_count(conn, &vote.menu_id)
            .await
    }

    /// A vote moved from `old_menu_id` to `new_menu_id`.
    ///
    /// Both menus are touched in ascending ID order, so two transactions
    /// moving votes in opposite directions lock the rows in the same order.
    pub async fn on_vote_menu_changed<C: ConnectionTrait>(
        &self,
        conn: &C,
        vote: &vote::Model,
        old_menu_id: &str,
        new_menu_id: &str,
    ) -> AppResult<()> {
        if old_menu_id == new_menu_id {
            return Ok(());
        }

        if old_menu_id < new_menu_id {
            self.decrement(conn, vote, old_menu_id).await?;
            self.menu_repo.increment_vote_count(conn, new_menu_id).await
        } else {
            self.menu_repo.increment_vote_count(conn, new_menu_id).await?;
            self.decrement(conn, vote, old_menu_id).await
        }
    }

    /// A vote was removed: its menu loses one vote.
    pub async fn on_vote_deleted<C: ConnectionTrait>(
        &self,
        conn: &C,
        vote: &vote::Model,
    ) -> AppResult<()> {
        self.decrement(conn, vote, &vote.menu_id).await
    }

    async fn decrement<C: ConnectionTrait>(
        &self,
        conn: &C,
        vote: &vote::Model,
        menu_id: &str,
    ) -> AppResult<()> {
        self.menu_repo
            .decrement_vote_count(conn, menu_id)
            .await
            .inspect_err(|e| {
                if matches!(e, AppError::InvariantViolation(_)) {
                    tracing::error!(
                        error = %e,
                        vote_id = %vote.id,
                        menu_id = %menu_id,
                        "Vote tally out of sync with vote records"
                    );
                }
            })
    }
}
