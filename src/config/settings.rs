//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB,
    DEFAULT_HASH_PARALLELISM, DEFAULT_JWT_EXPIRATION_MINUTES, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MAX_JWT_EXPIRATION_MINUTES, MIN_JWT_SECRET_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: DEFAULT_HASH_MEMORY_KIB,
            iterations: DEFAULT_HASH_ITERATIONS,
            parallelism: DEFAULT_HASH_PARALLELISM,
        }
    }
}

/// Password rules enforced at signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_symbol: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_symbol: false,
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub hashing: HashingConfig,
    pub password_policy: PasswordPolicy,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("hashing", &self.hashing)
            .field("password_policy", &self.password_policy)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns a config error if JWT_SECRET is missing in a release build,
    /// is too short, or if any numeric setting fails to parse.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::config(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let password_policy = PasswordPolicy {
            min_length: parse_var("PASSWORD_MIN_LENGTH", MIN_PASSWORD_LENGTH)?,
            require_uppercase: parse_var("PASSWORD_REQUIRE_UPPERCASE", false)?,
            require_lowercase: parse_var("PASSWORD_REQUIRE_LOWERCASE", false)?,
            require_digit: parse_var("PASSWORD_REQUIRE_DIGIT", false)?,
            require_symbol: parse_var("PASSWORD_REQUIRE_SYMBOL", false)?,
        };

        let hashing = HashingConfig {
            memory_kib: parse_var("HASH_MEMORY_KIB", DEFAULT_HASH_MEMORY_KIB)?,
            iterations: parse_var("HASH_ITERATIONS", DEFAULT_HASH_ITERATIONS)?,
            parallelism: parse_var("HASH_PARALLELISM", DEFAULT_HASH_PARALLELISM)?,
        };

        Self::validated(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_minutes: parse_var(
                "JWT_EXPIRATION_MINUTES",
                DEFAULT_JWT_EXPIRATION_MINUTES,
            )?,
            hashing,
            password_policy,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
        })
    }

    /// Build a configuration from explicit values, keeping defaults for the rest.
    pub fn new(
        jwt_secret: impl Into<String>,
        hashing: HashingConfig,
        password_policy: PasswordPolicy,
    ) -> AppResult<Self> {
        Self::validated(Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: jwt_secret.into(),
            jwt_expiration_minutes: DEFAULT_JWT_EXPIRATION_MINUTES,
            hashing,
            password_policy,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    fn validated(self) -> AppResult<Self> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&self.jwt_expiration_minutes) {
            return Err(AppError::config(format!(
                "JWT_EXPIRATION_MINUTES must be between 1 and {}",
                MAX_JWT_EXPIRATION_MINUTES
            )));
        }
        if self.password_policy.min_length < MIN_PASSWORD_LENGTH {
            return Err(AppError::config(format!(
                "PASSWORD_MIN_LENGTH may not be lower than {}",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(self)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Read an optional env var, falling back to `default` when unset.
fn parse_var<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{} has an invalid value", key))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-testing-only-32chars";

    #[test]
    fn test_new_uses_defaults() {
        let config =
            Config::new(SECRET, HashingConfig::default(), PasswordPolicy::default()).unwrap();

        assert_eq!(config.jwt_expiration_minutes, DEFAULT_JWT_EXPIRATION_MINUTES);
        assert_eq!(config.password_policy.min_length, MIN_PASSWORD_LENGTH);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::new("short", HashingConfig::default(), PasswordPolicy::default());
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_policy_below_floor_rejected() {
        let policy = PasswordPolicy {
            min_length: 4,
            ..PasswordPolicy::default()
        };
        let result = Config::new(SECRET, HashingConfig::default(), policy);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_token_lifetime_bounds() {
        let base =
            Config::new(SECRET, HashingConfig::default(), PasswordPolicy::default()).unwrap();

        for minutes in [0, -5, MAX_JWT_EXPIRATION_MINUTES + 1, 1_000_000_000_000] {
            let config = Config {
                jwt_expiration_minutes: minutes,
                ..base.clone()
            };
            assert!(
                matches!(config.validated(), Err(AppError::Config(_))),
                "{} minutes accepted",
                minutes
            );
        }

        let longest = Config {
            jwt_expiration_minutes: MAX_JWT_EXPIRATION_MINUTES,
            ..base
        };
        assert!(longest.validated().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config =
            Config::new(SECRET, HashingConfig::default(), PasswordPolicy::default()).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("[REDACTED]"));
    }
}
