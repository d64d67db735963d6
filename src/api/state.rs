//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::infra::Database;
use crate::services::{AuthService, ServiceContainer, Services, UserService};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User service
    pub user_service: Arc<dyn UserService>,
    /// Database connection, absent when running over another repository
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state from an assembled service container.
    pub fn from_services(services: &Services, database: Option<Arc<Database>>) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            database,
        }
    }

    /// Create new application state with manually injected services.
    pub fn new(auth_service: Arc<dyn AuthService>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            auth_service,
            user_service,
            database: None,
        }
    }
}
