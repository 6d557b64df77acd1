//! Daily result resolution.
//!
//! Closing a day picks the menu with the most votes, with two twists:
//! ties go to the lowest menu ID, and a restaurant that has already won
//! `streak_limit` days running yields to the runner-up. The winner's
//! restaurant extends its streak; a restaurant that was passed over starts
//! again from zero.

use std::sync::Arc;

use chrono::NaiveDate;
use lunchvote_common::{AppError, AppResult, IdGenerator, config::VotingConfig};
use lunchvote_db::{
    entities::{daily_result, menu, restaurant},
    repositories::{DailyResultRepository, MenuRepository, RestaurantRepository, RowLock},
};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde::Serialize;

use super::streak::StreakTracker;

/// A menu competing for the day, as seen by winner selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub menu_id: String,
    pub restaurant_id: String,
    pub vote_count: i32,
    pub winning_streak: i32,
}

/// Outcome of [`select_winner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinnerSelection<'a> {
    /// The menu that wins the day.
    pub winner: &'a Candidate,
    /// The top-ranked menu when it was disqualified by its streak.
    pub passed_over: Option<&'a Candidate>,
}

/// Pick the day's winner from candidates already ranked by vote count
/// (descending) and menu ID (ascending).
///
/// Returns `None` when there are no candidates. A top candidate whose
/// restaurant has reached `streak_limit` only yields when a runner-up
/// exists; a lone menu always wins.
#[must_use]
pub fn select_winner(ranked: &[Candidate], streak_limit: i32) -> Option<WinnerSelection<'_>> {
    match ranked {
        [] => None,
        [top, runner_up, ..] if top.winning_streak >= streak_limit => Some(WinnerSelection {
            winner: runner_up,
            passed_over: Some(top),
        }),
        [top, ..] => Some(WinnerSelection {
            winner: top,
            passed_over: None,
        }),
    }
}

/// What [`DailyResultResolver::resolve_day`] produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    /// `false` only when the day had no menus to choose from.
    pub winner_found: bool,
    pub result: daily_result::Model,
    pub winning_menu: Option<menu::Model>,
}

/// Closes voting for a day and records its winner.
#[derive(Clone)]
pub struct DailyResultResolver {
    db: Arc<DatabaseConnection>,
    result_repo: DailyResultRepository,
    menu_repo: MenuRepository,
    streaks: StreakTracker,
    streak_limit: i32,
    id_gen: IdGenerator,
}

impl DailyResultResolver {
    /// Create a new resolver.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        result_repo: DailyResultRepository,
        menu_repo: MenuRepository,
        restaurant_repo: RestaurantRepository,
        voting: &VotingConfig,
    ) -> Self {
        Self {
            db,
            result_repo,
            menu_repo,
            streaks: StreakTracker::new(restaurant_repo),
            streak_limit: voting.streak_limit,
            id_gen: IdGenerator::new(),
        }
    }

    /// Close voting for `day` and pick its winner.
    ///
    /// Runs in one transaction holding an exclusive lock on the day's
    /// result row. Resolving a day that is already finalized changes
    /// nothing and returns the stored outcome.
    pub async fn resolve_day(&self, day: NaiveDate) -> AppResult<Resolution> {
        let txn = self.db.begin().await.map_err(db_error)?;

        let result = self
            .result_repo
            .find_or_insert(&txn, self.id_gen.generate(), day, RowLock::Exclusive)
            .await?;

        if result.finalized {
            let resolution = self.stored_resolution(&txn, result).await?;
            txn.commit().await.map_err(db_error)?;
            tracing::debug!(voting_date = %day, "Day already resolved");
            return Ok(resolution);
        }

        let ranked = self.menu_repo.find_ranked_by_date(&txn, day).await?;
        let candidates = ranked
            .iter()
            .map(|(menu, restaurant)| candidate(menu, restaurant.as_ref()))
            .collect::<AppResult<Vec<_>>>()?;

        let Some(selection) = select_winner(&candidates, self.streak_limit) else {
            txn.commit().await.map_err(db_error)?;
            tracing::info!(voting_date = %day, "No menus published; no winner");
            return Ok(Resolution {
                winner_found: false,
                result,
                winning_menu: None,
            });
        };

        if let Some(passed_over) = selection.passed_over {
            self.streaks.reset(&txn, &passed_over.restaurant_id).await?;
            tracing::info!(
                voting_date = %day,
                restaurant_id = %passed_over.restaurant_id,
                streak = passed_over.winning_streak,
                "Top restaurant passed over for its winning streak"
            );
        }
        self.streaks
            .increment(&txn, &selection.winner.restaurant_id)
            .await?;

        let result = self
            .result_repo
            .finalize(&txn, &result.id, &selection.winner.menu_id)
            .await?;

        txn.commit().await.map_err(db_error)?;

        let winning_menu = ranked
            .into_iter()
            .map(|(menu, _)| menu)
            .find(|menu| menu.id == selection.winner.menu_id);

        tracing::info!(
            voting_date = %day,
            menu_id = %selection.winner.menu_id,
            restaurant_id = %selection.winner.restaurant_id,
            votes = selection.winner.vote_count,
            "Daily result finalized"
        );

        Ok(Resolution {
            winner_found: true,
            result,
            winning_menu,
        })
    }

    /// Get the result recorded for a day.
    pub async fn get_result(&self, day: NaiveDate) -> AppResult<daily_result::Model> {
        self.result_repo
            .find_by_date(day)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No result for {day}")))
    }

    /// List all recorded results, most recent day first.
    pub async fn list_results(&self) -> AppResult<Vec<daily_result::Model>> {
        self.result_repo.find_all().await
    }

    async fn stored_resolution(
        &self,
        txn: &DatabaseTransaction,
        result: daily_result::Model,
    ) -> AppResult<Resolution> {
        let Some(menu_id) = result.winning_menu_id.as_deref() else {
            let err = AppError::InvariantViolation(format!(
                "result for {} is finalized without a winner",
                result.voting_date
            ));
            tracing::error!(error = %err, result_id = %result.id, "Corrupt daily result");
            return Err(err);
        };

        let winning_menu = self.menu_repo.find_by_id_in(txn, menu_id).await?;

        Ok(Resolution {
            winner_found: true,
            result,
            winning_menu,
        })
    }
}

fn candidate(menu: &menu::Model, restaurant: Option<&restaurant::Model>) -> AppResult<Candidate> {
    let restaurant = restaurant.ok_or_else(|| {
        AppError::InvariantViolation(format!("menu {} has no restaurant", menu.id))
    })?;

    Ok(Candidate {
        menu_id: menu.id.clone(),
        restaurant_id: restaurant.id.clone(),
        vote_count: menu.vote_count,
        winning_streak: restaurant.winning_streak,
    })
}

fn db_error(e: sea_orm::DbErr) -> AppError {
    AppError::Database(e.to_string())
}
