//! Consecutive-win counter per restaurant.
//!
//! Only the daily result resolver moves streaks, and only inside the
//! transaction that finalizes a day.

use lunchvote_common::AppResult;
use lunchvote_db::repositories::RestaurantRepository;
use sea_orm::ConnectionTrait;

#[derive(Clone)]
pub(crate) struct StreakTracker {
    restaurant_repo: RestaurantRepository,
}

impl StreakTracker {
    pub(crate) const fn new(restaurant_repo: RestaurantRepository) -> Self {
        Self { restaurant_repo }
    }

    /// The restaurant won another day.
    pub(crate) async fn increment<C: ConnectionTrait>(
        &self,
        conn: &C,
        restaurant_id: &str,
    ) -> AppResult<()> {
        self.restaurant_repo
            .increment_winning_streak(conn, restaurant_id)
            .await
    }

    /// The restaurant was passed over despite topping the vote.
    pub(crate) async fn reset<C: ConnectionTrait>(
        &self,
        conn: &C,
        restaurant_id: &str,
    ) -> AppResult<()> {
        self.restaurant_repo
            .reset_winning_streak(conn, restaurant_id)
            .await
    }
}
