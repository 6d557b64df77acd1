//! User service.

use lunchvote_common::{AppError, AppResult, IdGenerator};
use lunchvote_db::{
    entities::{user, user::UserRole},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;

/// Input for creating a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub username: String,
    pub role: UserRole,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a user. Usernames are unique.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("Username cannot be empty".to_string()));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username.to_string()),
            role: Set(input.role),
            created_at: Set(chrono::Utc::now().into()),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, role = ?user.role, "Created user");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Resolve the acting user, if it exists.
    pub async fn find(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.user_repo.find_by_id(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lunchvote_db::test_utils::TestDatabase;

    #[tokio::test]
    async fn test_create_and_get() {
        let db = TestDatabase::in_memory().await.unwrap();
        let service = UserService::new(UserRepository::new(db.connection()));

        let created = service
            .create(CreateUserInput {
                username: "  alice ".to_string(),
                role: UserRole::Employee,
            })
            .await
            .unwrap();

        assert_eq!(created.username, "alice");
        let fetched = service.get(&created.id).await.unwrap();
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.role, UserRole::Employee);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let db = TestDatabase::in_memory().await.unwrap();
        let service = UserService::new(UserRepository::new(db.connection()));
        let input = || CreateUserInput {
            username: "bob".to_string(),
            role: UserRole::Admin,
        };

        service.create(input()).await.unwrap();
        let result = service.create(input()).await;

        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_empty_username() {
        let db = TestDatabase::in_memory().await.unwrap();
        let service = UserService::new(UserRepository::new(db.connection()));

        let result = service
            .create(CreateUserInput {
                username: " ".to_string(),
                role: UserRole::Employee,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
