//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

pub mod access_voter;
mod auth_service;
pub mod container;
mod identity_service;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use access_voter::{combine, require, require_roles, AccessVoter, Vote, Voter};
pub use auth_service::{AuthService, Authenticator};
pub use identity_service::IdentityService;
pub use token_service::{Claims, TokenResponse, TokenService};
pub use user_service::{UserManager, UserService};
