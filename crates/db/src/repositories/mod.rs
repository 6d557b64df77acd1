//! Database repositories.
//!
//! Repositories own one `Arc<DatabaseConnection>` for plain reads and
//! writes. Methods that must run inside a caller's transaction take the
//! connection explicitly as `conn: &C` where `C: ConnectionTrait`, so a
//! `DatabaseTransaction` can be threaded through several repositories.

mod daily_result;
mod menu;
mod restaurant;
mod user;
mod vote;

pub use daily_result::{DailyResultRepository, RowLock};
pub use menu::MenuRepository;
pub use restaurant::RestaurantRepository;
pub use user::UserRepository;
pub use vote::VoteRepository;

use lunchvote_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a failed write, turning unique-index and foreign-key violations into
/// [`AppError::ConstraintViolation`] with the given message.
pub(crate) fn write_error(err: DbErr, conflict: impl FnOnce() -> String) -> AppError {
    match err.sql_err() {
        Some(
            SqlErr::UniqueConstraintViolation(_) | SqlErr::ForeignKeyConstraintViolation(_),
        ) => AppError::ConstraintViolation(conflict()),
        _ => AppError::Database(err.to_string()),
    }
}
