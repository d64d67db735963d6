//! Identity service - credential verification and profile projection.

use std::sync::Arc;

use crate::domain::{Credentials, Identity, PasswordHasher, Profile};
use crate::errors::{AppError, AppResult};
use crate::infra::IdentityRepository;

/// Plaintext behind the decoy digest; never matches a real login because the
/// decoy is only consulted when no identity exists.
const DECOY_PLAINTEXT: &str = "decoy-password-for-unknown-accounts";

/// Looks up identities and checks their secrets.
pub struct IdentityService {
    repo: Arc<dyn IdentityRepository>,
    hasher: PasswordHasher,
    decoy_digest: String,
}

impl IdentityService {
    /// Create the service. Hashes the decoy digest once, at the configured cost.
    pub fn new(repo: Arc<dyn IdentityRepository>, hasher: PasswordHasher) -> AppResult<Self> {
        let decoy_digest = hasher.hash(DECOY_PLAINTEXT)?;
        Ok(Self {
            repo,
            hasher,
            decoy_digest,
        })
    }

    /// Return the identity matching `credentials`.
    ///
    /// Unknown email and wrong password fail identically with
    /// `InvalidCredentials`. An unknown email still pays for a full hash
    /// comparison so timing does not reveal which case occurred.
    pub async fn verify(&self, credentials: &Credentials) -> AppResult<Identity> {
        let email = credentials.normalized_email();
        let found = self.repo.find_by_email(&email).await?;

        let digest = match &found {
            Some(identity) => identity.password_hash.clone(),
            None => self.decoy_digest.clone(),
        };
        let matched = self
            .hasher
            .compare_async(credentials.password.clone(), digest)
            .await?;

        match found {
            Some(identity) if matched => Ok(identity),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    /// Reduce an identity to its token-safe profile.
    pub fn project(&self, identity: &Identity) -> Profile {
        Profile::from(identity)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mockall::predicate::function;

    use super::*;
    use crate::config::HashingConfig;
    use crate::domain::Role;
    use crate::infra::MockIdentityRepository;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn stored(hasher: &PasswordHasher, password: &str) -> Identity {
        Identity {
            id: 9,
            email: "jane@example.com".to_string(),
            password_hash: hasher.hash(password).unwrap(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    fn service_with(repo: MockIdentityRepository) -> IdentityService {
        IdentityService::new(Arc::new(repo), hasher()).unwrap()
    }

    #[tokio::test]
    async fn test_verify_success_uses_normalized_email() {
        let identity = stored(&hasher(), "correct-horse");
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_email()
            .with(function(|email: &str| email == "jane@example.com"))
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        let service = service_with(repo);
        let result = service
            .verify(&Credentials::new(" Jane@Example.com", "correct-horse"))
            .await;

        assert_eq!(result.unwrap().id, 9);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let identity = stored(&hasher(), "correct-horse");
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_email()
            .with(function(|email: &str| email == "jane@example.com"))
            .returning(move |_| Ok(Some(identity.clone())));
        repo.expect_find_by_email()
            .with(function(|email: &str| email == "ghost@example.com"))
            .returning(|_| Ok(None));

        let service = service_with(repo);
        let wrong_password = service
            .verify(&Credentials::new("jane@example.com", "battery-staple"))
            .await
            .unwrap_err();
        let unknown_user = service
            .verify(&Credentials::new("ghost@example.com", "battery-staple"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_decoy_never_admits_unknown_user() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = service_with(repo);
        let result = service
            .verify(&Credentials::new("ghost@example.com", DECOY_PLAINTEXT))
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let mut repo = MockIdentityRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Err(AppError::internal("connection reset")));

        let service = service_with(repo);
        let result = service
            .verify(&Credentials::new("jane@example.com", "correct-horse"))
            .await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_project_strips_secrets() {
        let service = service_with(MockIdentityRepository::new());
        let identity = Identity {
            last_name: Some("Doe".to_string()),
            ..stored(&hasher(), "correct-horse")
        };

        let profile = service.project(&identity);
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.subject, "9");
        assert_eq!(profile.role, Role::User);
        assert!(!serde_json::to_string(&profile).unwrap().contains("argon2"));
    }
}
