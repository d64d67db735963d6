//! Password hashing - one-way transform and verification of plaintext secrets.
//!
//! Digests are Argon2id PHC strings carrying their own salt and cost
//! parameters, so verification never needs anything besides the digest.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashingConfig;
use crate::errors::{AppError, AppResult};

/// Salted one-way password hasher.
///
/// Cheap to clone; holds only the cost parameters.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Create a hasher with the given cost factor.
    ///
    /// # Errors
    /// Returns a config error when Argon2 rejects the parameters.
    pub fn new(config: HashingConfig) -> AppResult<Self> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| AppError::config(format!("Invalid hashing parameters: {}", e)))?;

        Ok(Self { params })
    }

    /// Hash a plaintext with a freshly generated salt.
    ///
    /// Two calls on the same input yield different digests.
    ///
    /// # Errors
    /// Returns a validation error if the plaintext is empty.
    pub fn hash(&self, plaintext: &str) -> AppResult<String> {
        if plaintext.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Check a plaintext against a stored digest.
    ///
    /// Uses the salt and parameters embedded in `digest`. The final tag
    /// comparison is constant-time. A wrong password or a malformed digest
    /// both yield `false`.
    pub fn compare(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// [`hash`](Self::hash) on the blocking pool.
    ///
    /// Dropping the returned future abandons the result; the worker
    /// touches no shared state.
    pub async fn hash_async(&self, plaintext: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
    }

    /// [`compare`](Self::compare) on the blocking pool.
    pub async fn compare_async(&self, plaintext: String, digest: String) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.compare(&plaintext, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))
    }

    #[inline]
    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(HashingConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_compare() {
        let hasher = hasher();
        let digest = hasher.hash("SecurePassword123!").unwrap();

        assert_ne!(digest, "SecurePassword123!");
        assert!(digest.starts_with("$argon2id$"));
        assert!(hasher.compare("SecurePassword123!", &digest));
        assert!(!hasher.compare("WrongPassword123", &digest));
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = hasher();
        let first = hasher.hash("SamePassword123").unwrap();
        let second = hasher.hash("SamePassword123").unwrap();

        // Different salts produce different hashes
        assert_ne!(first, second);
        // But both verify correctly
        assert!(hasher.compare("SamePassword123", &first));
        assert!(hasher.compare("SamePassword123", &second));
    }

    #[test]
    fn test_distinct_plaintexts_never_cross_verify() {
        let hasher = hasher();
        let inputs = ["alpha-secret", "alpha-secreT", "beta-secret", " alpha-secret"];

        for p in inputs {
            let digest = hasher.hash(p).unwrap();
            for q in inputs.iter().filter(|q| **q != p) {
                assert!(!hasher.compare(q, &digest), "{q:?} matched digest of {p:?}");
            }
        }
    }

    #[test]
    fn test_empty_plaintext_rejected() {
        let result = hasher().hash("");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_malformed_digest_is_a_mismatch() {
        let hasher = hasher();
        assert!(!hasher.compare("anything", "not-a-phc-string"));
        assert!(!hasher.compare("anything", ""));
    }

    #[test]
    fn test_digest_from_other_cost_still_verifies() {
        let strong = PasswordHasher::new(HashingConfig {
            memory_kib: 128,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        let digest = strong.hash("carried-params").unwrap();

        assert!(hasher().compare("carried-params", &digest));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordHasher::new(HashingConfig {
            memory_kib: 64,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_async_variants() {
        let hasher = hasher();
        let digest = hasher.hash_async("offloaded-secret".to_string()).await.unwrap();

        assert!(hasher
            .compare_async("offloaded-secret".to_string(), digest.clone())
            .await
            .unwrap());
        assert!(!hasher
            .compare_async("other-secret".to_string(), digest)
            .await
            .unwrap());
    }
}
