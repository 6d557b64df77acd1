//! Database entities.

pub mod daily_result;
pub mod menu;
pub mod restaurant;
pub mod user;
pub mod vote;

pub use daily_result::Entity as DailyResult;
pub use menu::Entity as Menu;
pub use restaurant::Entity as Restaurant;
pub use user::Entity as User;
pub use vote::Entity as Vote;
