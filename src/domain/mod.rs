//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! Contains: Entities, Value Objects, Domain Services.

pub mod credentials;
pub mod identity;
pub mod password;
pub mod profile;

pub use credentials::{normalize_email, CredentialValidator, Credentials, Registration};
pub use identity::{Identity, NewIdentity, PublicIdentity, Role};
pub use password::PasswordHasher;
pub use profile::{display_name, Profile};
