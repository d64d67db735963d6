//! Identity repository - storage of user records.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set,
    SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{Identity, NewIdentity};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Identity repository trait for dependency injection.
///
/// The auth core only reads by email and writes via `create`; the id-based
/// operations back the user endpoints.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Find identity by its normalized email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>>;

    /// Find identity by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Identity>>;

    /// Persist a new identity, returning it with its assigned id
    async fn create(&self, identity: NewIdentity) -> AppResult<Identity>;

    /// Delete identity by ID
    async fn delete_by_id(&self, id: i64) -> AppResult<()>;
}

/// SeaORM-backed implementation of IdentityRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl IdentityRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Identity::from))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Identity>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Identity::from))
    }

    async fn create(&self, identity: NewIdentity) -> AppResult<Identity> {
        let active_model = ActiveModel {
            id: NotSet,
            email: Set(identity.email),
            password_hash: Set(identity.password_hash),
            first_name: Set(identity.first_name),
            last_name: Set(identity.last_name),
            role: Set(identity.role.to_string()),
            created_at: Set(chrono::Utc::now()),
        };

        // A concurrent signup can slip past the service-level existence check
        let model = active_model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("User"),
            _ => AppError::from(e),
        })?;

        Ok(Identity::from(model))
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
