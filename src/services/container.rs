//! Service Container - explicit assembly of application services.
//!
//! Every collaborator is constructed here at process start and passed by
//! value or `Arc`; nothing is looked up at runtime.

use std::sync::Arc;

use super::{AuthService, Authenticator, UserManager, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{IdentityRepository, UserStore};

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from already-built services
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Create service container over any identity repository
    pub fn from_repository(repo: Arc<dyn IdentityRepository>, config: &Config) -> AppResult<Self> {
        let auth_service = Arc::new(Authenticator::from_config(repo.clone(), config)?);
        let user_service = Arc::new(UserManager::new(repo));

        Ok(Self::new(auth_service, user_service))
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> AppResult<Self> {
        Self::from_repository(Arc::new(UserStore::new(db)), config)
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
