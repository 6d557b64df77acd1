//! Business logic services.

#![allow(missing_docs)]

pub mod daily_result;
pub mod menu;
pub mod restaurant;
mod streak;
pub mod user;
pub mod vote;
pub mod vote_ledger;

pub use daily_result::{Candidate, DailyResultResolver, Resolution, WinnerSelection, select_winner};
pub use menu::{MenuService, PublishMenuInput, UpdateMenuInput};
pub use restaurant::{CreateRestaurantInput, RestaurantService, UpdateRestaurantInput};
pub use user::{CreateUserInput, UserService};
pub use vote::{CastVoteInput, ChangeVoteInput, VoteService};
pub use vote_ledger::VoteLedger;
