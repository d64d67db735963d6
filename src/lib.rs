//! Storefront API - account and access core
//!
//! Signup, login and role-based authorization for the storefront backend,
//! served over Axum and persisted with SeaORM.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Identities, credentials, password hashing, profiles
//! - **services**: Identity verification, tokens, access voting, use cases
//! - **infra**: Database, migrations and the identity repository
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Bootstrap the first admin
//! cargo run -- create-admin --email root@example.com --password 'change-me-now'
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Credentials, Identity, Profile, Role};
pub use errors::{AppError, AppResult};
