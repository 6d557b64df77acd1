//! Database integration tests.
//!
//! Most tests run against a migrated in-memory `SQLite` database. The
//! `PostgreSQL` test requires a running instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `lunchvote_test`)
//!   `TEST_DB_PASSWORD` (default: `lunchvote_test`)
//!   `TEST_DB_NAME` (default: `lunchvote_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, Utc};
use lunchvote_common::AppError;
use lunchvote_db::{
    entities::{menu, restaurant, user, user::UserRole, vote},
    repositories::{
        DailyResultRepository, MenuRepository, RestaurantRepository, RowLock, UserRepository,
        VoteRepository,
    },
    test_utils::{TestDatabase, TestDbConfig},
};
use sea_orm::{Set, TransactionTrait};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

async fn seed_user(db: &TestDatabase, id: &str, role: UserRole) -> user::Model {
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

async fn seed_restaurant(db: &TestDatabase, id: &str, owner_id: &str) -> restaurant::Model {
    RestaurantRepository::new(db.connection())
        .create(restaurant::ActiveModel {
            id: Set(id.to_string()),
            owner_id: Set(owner_id.to_string()),
            name: Set(format!("Restaurant {id}")),
            address: Set(String::new()),
            contact_no: Set(String::new()),
            winning_streak: Set(0),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        })
        .await
        .unwrap()
}

fn menu_model(id: &str, restaurant_id: &str, date: NaiveDate) -> menu::ActiveModel {
    menu::ActiveModel {
        id: Set(id.to_string()),
        restaurant_id: Set(restaurant_id.to_string()),
        description: Set("Daily special".to_string()),
        upload_date: Set(date),
        vote_count: Set(0),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

fn vote_model(id: &str, employee_id: &str, menu_id: &str) -> vote::ActiveModel {
    vote::ActiveModel {
        id: Set(id.to_string()),
        employee_id: Set(employee_id.to_string()),
        menu_id: Set(menu_id.to_string()),
        voting_date: Set(day()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
}

#[tokio::test]
async fn test_vote_count_increments_and_decrements() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_restaurant(&db, "r1", "owner").await;
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m1", "r1", day())).await.unwrap();

    let conn = db.connection();
    menus.increment_vote_count(conn.as_ref(), "m1").await.unwrap();
    menus.increment_vote_count(conn.as_ref(), "m1").await.unwrap();
    menus.decrement_vote_count(conn.as_ref(), "m1").await.unwrap();

    assert_eq!(menus.get_by_id("m1").await.unwrap().vote_count, 1);
}

#[tokio::test]
async fn test_vote_count_never_goes_negative() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_restaurant(&db, "r1", "owner").await;
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m1", "r1", day())).await.unwrap();

    let conn = db.connection();
    let result = menus.decrement_vote_count(conn.as_ref(), "m1").await;

    assert!(matches!(result, Err(AppError::InvariantViolation(_))));
    assert_eq!(menus.get_by_id("m1").await.unwrap().vote_count, 0);
}

#[tokio::test]
async fn test_one_menu_per_restaurant_per_day() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_restaurant(&db, "r1", "owner").await;
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m1", "r1", day())).await.unwrap();

    let duplicate = menus.create(menu_model("m2", "r1", day())).await;
    assert!(matches!(duplicate, Err(AppError::ConstraintViolation(_))));

    let next_day = day().succ_opt().unwrap();
    assert!(menus.create(menu_model("m3", "r1", next_day)).await.is_ok());
}

#[tokio::test]
async fn test_one_vote_per_employee_per_day() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_user(&db, "e1", UserRole::Employee).await;
    seed_restaurant(&db, "r1", "owner").await;
    seed_restaurant(&db, "r2", "owner").await;
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m1", "r1", day())).await.unwrap();
    menus.create(menu_model("m2", "r2", day())).await.unwrap();

    let votes = VoteRepository::new(db.connection());
    let conn = db.connection();
    votes
        .create(conn.as_ref(), vote_model("v1", "e1", "m1"))
        .await
        .unwrap();

    let second = votes.create(conn.as_ref(), vote_model("v2", "e1", "m2")).await;
    assert!(matches!(second, Err(AppError::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_ranked_menus_break_ties_by_lowest_id() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    for id in ["ra", "rb", "rc"] {
        seed_restaurant(&db, id, "owner").await;
    }
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m-b", "rb", day())).await.unwrap();
    menus.create(menu_model("m-a", "ra", day())).await.unwrap();
    menus.create(menu_model("m-c", "rc", day())).await.unwrap();

    let conn = db.connection();
    menus.increment_vote_count(conn.as_ref(), "m-c").await.unwrap();
    menus.increment_vote_count(conn.as_ref(), "m-c").await.unwrap();
    menus.increment_vote_count(conn.as_ref(), "m-b").await.unwrap();
    menus.increment_vote_count(conn.as_ref(), "m-a").await.unwrap();

    let ranked = menus.find_ranked_by_date(conn.as_ref(), day()).await.unwrap();
    let ids: Vec<&str> = ranked.iter().map(|(m, _)| m.id.as_str()).collect();

    assert_eq!(ids, ["m-c", "m-a", "m-b"]);
    assert!(ranked.iter().all(|(_, r)| r.is_some()));
}

#[tokio::test]
async fn test_find_or_insert_is_idempotent() {
    let db = TestDatabase::in_memory().await.unwrap();
    let results = DailyResultRepository::new(db.connection());
    let conn = db.connection();

    let first = results
        .find_or_insert(conn.as_ref(), "res1".to_string(), day(), RowLock::Exclusive)
        .await
        .unwrap();
    let second = results
        .find_or_insert(conn.as_ref(), "res2".to_string(), day(), RowLock::Shared)
        .await
        .unwrap();

    assert_eq!(first.id, "res1");
    assert_eq!(second.id, "res1");
    assert!(!second.finalized);
    assert_eq!(results.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_finalize_only_once() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_restaurant(&db, "r1", "owner").await;
    MenuRepository::new(db.connection())
        .create(menu_model("m1", "r1", day()))
        .await
        .unwrap();

    let results = DailyResultRepository::new(db.connection());
    let conn = db.connection();
    let placeholder = results
        .find_or_insert(conn.as_ref(), "res1".to_string(), day(), RowLock::Exclusive)
        .await
        .unwrap();

    let finalized = results
        .finalize(conn.as_ref(), &placeholder.id, "m1")
        .await
        .unwrap();
    assert!(finalized.finalized);
    assert_eq!(finalized.winning_menu_id.as_deref(), Some("m1"));

    let again = results.finalize(conn.as_ref(), &placeholder.id, "m1").await;
    assert!(matches!(again, Err(AppError::InvariantViolation(_))));
}

#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_trace() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_user(&db, "e1", UserRole::Employee).await;
    seed_restaurant(&db, "r1", "owner").await;
    let menus = MenuRepository::new(db.connection());
    menus.create(menu_model("m1", "r1", day())).await.unwrap();
    let votes = VoteRepository::new(db.connection());

    let txn = db.conn.begin().await.unwrap();
    votes
        .create(&txn, vote_model("v1", "e1", "m1"))
        .await
        .unwrap();
    menus.increment_vote_count(&txn, "m1").await.unwrap();
    txn.rollback().await.unwrap();

    assert_eq!(menus.get_by_id("m1").await.unwrap().vote_count, 0);
    assert_eq!(votes.count_by_menu("m1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_streak_increment_and_reset() {
    let db = TestDatabase::in_memory().await.unwrap();
    seed_user(&db, "owner", UserRole::RestaurantOwner).await;
    seed_restaurant(&db, "r1", "owner").await;
    let restaurants = RestaurantRepository::new(db.connection());
    let conn = db.connection();

    restaurants
        .increment_winning_streak(conn.as_ref(), "r1")
        .await
        .unwrap();
    restaurants
        .increment_winning_streak(conn.as_ref(), "r1")
        .await
        .unwrap();
    assert_eq!(restaurants.get_by_id("r1").await.unwrap().winning_streak, 2);

    restaurants
        .reset_winning_streak(conn.as_ref(), "r1")
        .await
        .unwrap();
    assert_eq!(restaurants.get_by_id("r1").await.unwrap().winning_streak, 0);
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_postgres_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(&config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
    result.unwrap().cleanup().await.expect("Cleanup failed");
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
