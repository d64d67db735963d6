//! Authentication service - signup, login and token-based authorization.
//!
//! Composes the credential validator, password hasher, identity service,
//! token service and access voter behind one trait the transport layer uses.

use async_trait::async_trait;
use std::sync::Arc;

use super::access_voter::{require_roles, AccessVoter, Vote};
use super::identity_service::IdentityService;
use super::token_service::{TokenResponse, TokenService};
use crate::config::Config;
use crate::domain::{
    CredentialValidator, Credentials, Identity, NewIdentity, PasswordHasher, Profile,
    Registration, Role,
};
use crate::errors::{AppError, AppResult};
use crate::infra::IdentityRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account. The role is always `user`.
    async fn signup(&self, registration: Registration) -> AppResult<Identity>;

    /// Register an admin account on behalf of an authenticated admin.
    async fn create_admin(&self, actor: &Profile, registration: Registration)
        -> AppResult<Identity>;

    /// Verify credentials and return a signed token
    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse>;

    /// Verify a token and extract its profile
    fn verify_token(&self, token: &str) -> AppResult<Profile>;

    /// Vote on a token against a route's allowed roles.
    ///
    /// A token that fails verification counts as no profile at all.
    fn authorize(&self, token: &str, allowed_roles: &[Role]) -> Vote;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    repo: Arc<dyn IdentityRepository>,
    validator: CredentialValidator,
    hasher: PasswordHasher,
    identities: IdentityService,
    tokens: TokenService,
}

impl Authenticator {
    /// Assemble the service from its collaborators.
    pub fn new(
        repo: Arc<dyn IdentityRepository>,
        validator: CredentialValidator,
        hasher: PasswordHasher,
        tokens: TokenService,
    ) -> AppResult<Self> {
        let identities = IdentityService::new(repo.clone(), hasher.clone())?;
        Ok(Self {
            repo,
            validator,
            hasher,
            identities,
            tokens,
        })
    }

    /// Build every collaborator from configuration.
    pub fn from_config(repo: Arc<dyn IdentityRepository>, config: &Config) -> AppResult<Self> {
        Self::new(
            repo,
            CredentialValidator::new(config.password_policy.clone()),
            PasswordHasher::new(config.hashing)?,
            TokenService::from_config(config)?,
        )
    }

    /// Create an admin without an acting profile.
    ///
    /// Operator bootstrap only; not reachable from the HTTP layer.
    pub async fn provision_admin(&self, registration: Registration) -> AppResult<Identity> {
        self.register(registration.with_role(Role::Admin)).await
    }

    /// Store a new account under the role already fixed on its credentials.
    async fn register(&self, registration: Registration) -> AppResult<Identity> {
        self.validator.validate_registration(&registration)?;

        let Registration {
            credentials,
            first_name,
            last_name,
        } = registration;
        let role = credentials.role.unwrap_or_default();

        let email = credentials.normalized_email();
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = self.hasher.hash_async(credentials.password).await?;
        let identity = self
            .repo
            .create(NewIdentity {
                email,
                password_hash,
                first_name: non_blank(first_name),
                last_name: non_blank(last_name),
                role,
            })
            .await?;

        tracing::info!(user_id = identity.id, role = %identity.role, "Identity created");
        Ok(identity)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl AuthService for Authenticator {
    async fn signup(&self, registration: Registration) -> AppResult<Identity> {
        self.register(registration.with_role(Role::User)).await
    }

    async fn create_admin(
        &self,
        actor: &Profile,
        registration: Registration,
    ) -> AppResult<Identity> {
        require_roles(actor, &[Role::Admin])?;
        let identity = self.register(registration.with_role(Role::Admin)).await?;
        tracing::info!(actor = %actor.subject, user_id = identity.id, "Admin created");
        Ok(identity)
    }

    async fn login(&self, credentials: Credentials) -> AppResult<TokenResponse> {
        let identity = match self.identities.verify(&credentials).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::info!("Login rejected");
                return Err(e);
            }
        };

        let profile = self.identities.project(&identity);
        let token = self.tokens.issue(&profile)?;

        tracing::info!(user_id = identity.id, "Login succeeded");
        Ok(token)
    }

    fn verify_token(&self, token: &str) -> AppResult<Profile> {
        self.tokens.verify(token)
    }

    fn authorize(&self, token: &str, allowed_roles: &[Role]) -> Vote {
        let profile = match self.tokens.verify(token) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::debug!(reason = %e, "Token not accepted for authorization");
                None
            }
        };
        AccessVoter::decide(profile.as_ref(), allowed_roles)
    }
}
