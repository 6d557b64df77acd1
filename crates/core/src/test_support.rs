//! Fixtures shared by the service tests.

use chrono::{NaiveDate, Utc};
use lunchvote_db::{
    entities::{menu, restaurant, user, user::UserRole},
    repositories::{MenuRepository, RestaurantRepository, UserRepository},
    test_utils::TestDatabase,
};
use sea_orm::Set;

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

pub async fn seed_user(db: &TestDatabase, id: &str, role: UserRole) -> user::Model {
    UserRepository::new(db.connection())
        .create(user::ActiveModel {
            id: Set(id.to_string()),
            username: Set(format!("user-{id}")),
            role: Set(role),
            created_at: Set(Utc::now().into()),
        })
        .await
        .unwrap()
}

pub async fn seed_restaurant(
    db: &TestDatabase,
    id: &str,
    owner_id: &str,
    winning_streak: i32,
) -> restaurant::Model {
    RestaurantRepository::new(db.connection())
        .create(restaurant::ActiveModel {
            id: Set(id.to_string()),
            owner_id: Set(owner_id.to_string()),
            name: Set(format!("Restaurant {id}")),
            address: Set("1 Main St".to_string()),
            contact_no: Set("555-0100".to_string()),
            winning_streak: Set(winning_streak),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap()
}

pub async fn seed_menu(
    db: &TestDatabase,
    id: &str,
    restaurant_id: &str,
    upload_date: NaiveDate,
) -> menu::Model {
    MenuRepository::new(db.connection())
        .create(menu::ActiveModel {
            id: Set(id.to_string()),
            restaurant_id: Set(restaurant_id.to_string()),
            description: Set("Daily special".to_string()),
            upload_date: Set(upload_date),
            vote_count: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap()
}

pub async fn vote_count(db: &TestDatabase, menu_id: &str) -> i32 {
    MenuRepository::new(db.connection())
        .get_by_id(menu_id)
        .await
        .unwrap()
        .vote_count
}

pub async fn streak(db: &TestDatabase, restaurant_id: &str) -> i32 {
    RestaurantRepository::new(db.connection())
        .get_by_id(restaurant_id)
        .await
        .unwrap()
        .winning_streak
}
