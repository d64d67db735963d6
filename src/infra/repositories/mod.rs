//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod user_repository;

pub use user_repository::{IdentityRepository, UserStore};

#[cfg(test)]
pub use user_repository::MockIdentityRepository;
