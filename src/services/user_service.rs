//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::Identity;
use crate::errors::{AppResult, OptionExt};
use crate::infra::IdentityRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<Identity>;

    /// Permanently delete user
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService over the identity repository.
pub struct UserManager {
    repo: Arc<dyn IdentityRepository>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(repo: Arc<dyn IdentityRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: i64) -> AppResult<Identity> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repo.delete_by_id(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::Role;
    use crate::errors::AppError;
    use crate::infra::MockIdentityRepository;

    fn create_test_identity(id: i64) -> Identity {
        Identity {
            id,
            email: "test@example.com".to_string(),
            password_hash: "hashed".to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_user_success() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_id()
            .with(eq(11))
            .returning(|id| Ok(Some(create_test_identity(id))));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user(11).await;

        assert_eq!(result.unwrap().id, 11);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo));
        let result = service.get_user(11).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_user_propagates_not_found() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Err(AppError::NotFound));

        let service = UserManager::new(Arc::new(repo));
        let result = service.delete_user(11).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
