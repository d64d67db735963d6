//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - Repositories over the persisted identity records

pub mod db;
pub mod repositories;

pub use db::{Database, Migrator};
pub use repositories::{IdentityRepository, UserStore};

#[cfg(test)]
pub use repositories::MockIdentityRepository;
