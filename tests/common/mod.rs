//! Shared fixtures for integration tests.
//!
//! Wires the real services over an in-memory repository so flows run
//! end to end without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use storefront_api::api::{create_router, AppState};
use storefront_api::config::{Config, HashingConfig, PasswordPolicy};
use storefront_api::domain::{Identity, NewIdentity};
use storefront_api::errors::{AppError, AppResult};
use storefront_api::infra::IdentityRepository;
use storefront_api::services::Services;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Identity store kept in a vector, assigning ids like a sequence would.
#[derive(Default)]
pub struct InMemoryIdentities {
    rows: Mutex<Vec<Identity>>,
}

impl InMemoryIdentities {
    pub fn stored(&self, email: &str) -> Option<Identity> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.email == email)
            .cloned()
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentities {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Identity>> {
        Ok(self.stored(email))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Identity>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id)
            .cloned())
    }

    async fn create(&self, identity: NewIdentity) -> AppResult<Identity> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.email == identity.email) {
            return Err(AppError::conflict("User"));
        }

        let created = Identity {
            id: rows.iter().map(|row| row.id).max().unwrap_or(0) + 1,
            email: identity.email,
            password_hash: identity.password_hash,
            first_name: identity.first_name,
            last_name: identity.last_name,
            role: identity.role,
            created_at: Utc::now(),
        };
        rows.push(created.clone());
        Ok(created)
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Configuration with a cheap hashing cost.
pub fn test_config() -> Config {
    Config::new(
        TEST_SECRET,
        HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
        PasswordPolicy::default(),
    )
    .unwrap()
}

pub fn services() -> (Arc<InMemoryIdentities>, Services) {
    let repo = Arc::new(InMemoryIdentities::default());
    let services = Services::from_repository(repo.clone(), &test_config()).unwrap();
    (repo, services)
}

pub fn router() -> (Arc<InMemoryIdentities>, Services, axum::Router) {
    let (repo, services) = services();
    let app = create_router(AppState::from_services(&services, None));
    (repo, services, app)
}
