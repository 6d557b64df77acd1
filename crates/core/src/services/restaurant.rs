//! Restaurant service.

use lunchvote_common::{AppError, AppResult, IdGenerator};
use lunchvote_db::{
    entities::{restaurant, user, user::UserRole},
    repositories::{DailyResultRepository, RestaurantRepository},
};
use sea_orm::Set;
use serde::Deserialize;

/// Input for creating a restaurant.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantInput {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_no: String,
}

/// Input for updating a restaurant. The winning streak is not editable.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_no: Option<String>,
}

/// Restaurant service for business logic.
#[derive(Clone)]
pub struct RestaurantService {
    restaurant_repo: RestaurantRepository,
    result_repo: DailyResultRepository,
    id_gen: IdGenerator,
}

impl RestaurantService {
    /// Create a new restaurant service.
    #[must_use]
    pub const fn new(
        restaurant_repo: RestaurantRepository,
        result_repo: DailyResultRepository,
    ) -> Self {
        Self {
            restaurant_repo,
            result_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a restaurant owned by `owner`.
    pub async fn create(
        &self,
        owner: &user::Model,
        input: CreateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        if owner.role != UserRole::RestaurantOwner {
            return Err(AppError::Forbidden(
                "Only restaurant owners can register restaurants".to_string(),
            ));
        }

        let model = restaurant::ActiveModel {
            id: Set(self.id_gen.generate()),
            owner_id: Set(owner.id.clone()),
            name: Set(input.name),
            address: Set(input.address),
            contact_no: Set(input.contact_no),
            winning_streak: Set(0),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.restaurant_repo.create(model).await
    }

    /// Get a restaurant by ID.
    pub async fn get(&self, id: &str) -> AppResult<restaurant::Model> {
        self.restaurant_repo.get_by_id(id).await
    }

    /// List all restaurants.
    pub async fn list(&self) -> AppResult<Vec<restaurant::Model>> {
        self.restaurant_repo.find_all().await
    }

    /// Update a restaurant's details.
    pub async fn update(
        &self,
        owner: &user::Model,
        id: &str,
        input: UpdateRestaurantInput,
    ) -> AppResult<restaurant::Model> {
        let restaurant = self.owned(owner, id).await?;

        let mut active: restaurant::ActiveModel = restaurant.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(contact_no) = input.contact_no {
            active.contact_no = Set(contact_no);
        }
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.restaurant_repo.update(active).await
    }

    /// Delete a restaurant along with its menus and their votes.
    ///
    /// A restaurant that won a finalized day is kept so the published
    /// result still names its menu.
    pub async fn delete(&self, owner: &user::Model, id: &str) -> AppResult<()> {
        let restaurant = self.owned(owner, id).await?;

        if self.result_repo.has_win_for_restaurant(&restaurant.id).await? {
            return Err(AppError::ConstraintViolation(format!(
                "Restaurant {} has won a published result and cannot be deleted",
                restaurant.name
            )));
        }

        self.restaurant_repo.delete(&restaurant.id).await
    }

    async fn owned(&self, owner: &user::Model, id: &str) -> AppResult<restaurant::Model> {
        let restaurant = self.restaurant_repo.get_by_id(id).await?;
        if restaurant.owner_id != owner.id {
            return Err(AppError::Forbidden(
                "You are not the owner of this restaurant".to_string(),
            ));
        }
        Ok(restaurant)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, streak};
    use lunchvote_db::test_utils::TestDatabase;

    fn service(db: &TestDatabase) -> RestaurantService {
        RestaurantService::new(
            RestaurantRepository::new(db.connection()),
            DailyResultRepository::new(db.connection()),
        )
    }

    fn input(name: &str) -> CreateRestaurantInput {
        CreateRestaurantInput {
            name: name.to_string(),
            address: "1 Main St".to_string(),
            contact_no: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn test_owner_creates_restaurant() {
        let db = TestDatabase::in_memory().await.unwrap();
        let owner = seed_user(&db, "owner", UserRole::RestaurantOwner).await;
        let service = service(&db);

        let restaurant = service.create(&owner, input("Noodle Bar")).await.unwrap();

        assert_eq!(restaurant.owner_id, "owner");
        assert_eq!(streak(&db, &restaurant.id).await, 0);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_employee_cannot_create_restaurant() {
        let db = TestDatabase::in_memory().await.unwrap();
        let employee = seed_user(&db, "e1", UserRole::Employee).await;

        let result = service(&db).create(&employee, input("Noodle Bar")).await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_only_owner_updates() {
        let db = TestDatabase::in_memory().await.unwrap();
        let owner = seed_user(&db, "owner", UserRole::RestaurantOwner).await;
        let other = seed_user(&db, "other", UserRole::RestaurantOwner).await;
        let service = service(&db);
        let restaurant = service.create(&owner, input("Noodle Bar")).await.unwrap();

        let rename = || UpdateRestaurantInput {
            name: Some("Ramen Bar".to_string()),
            ..Default::default()
        };

        let denied = service.update(&other, &restaurant.id, rename()).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let updated = service.update(&owner, &restaurant.id, rename()).await.unwrap();
        assert_eq!(updated.name, "Ramen Bar");
        assert_eq!(updated.address, "1 Main St");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = TestDatabase::in_memory().await.unwrap();
        let owner = seed_user(&db, "owner", UserRole::RestaurantOwner).await;
        let service = service(&db);
        let restaurant = service.create(&owner, input("Noodle Bar")).await.unwrap();

        service.delete(&owner, &restaurant.id).await.unwrap();

        let result = service.get(&restaurant.id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
