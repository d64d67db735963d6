//! Token service - signed, time-bounded bearer tokens.
//!
//! Tokens are HS256 JWTs. The signing secret is handed in once at
//! construction and never changes for the life of the service.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::{
    Config, MAX_JWT_EXPIRATION_MINUTES, SECONDS_PER_MINUTE, TOKEN_TYPE_BEARER,
};
use crate::domain::{Profile, Role};
use crate::errors::{AppError, AppResult};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the identity id as a string
    pub sub: String,
    /// Numeric identity id
    pub uid: i64,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

/// Issues and verifies profile tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("key", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl.num_seconds())
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    /// # Errors
    /// Returns a config error when the lifetime is outside the accepted range.
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let minutes = config.jwt_expiration_minutes;
        let ttl = Some(minutes)
            .filter(|m| (1..=MAX_JWT_EXPIRATION_MINUTES).contains(m))
            .and_then(Duration::try_minutes)
            .ok_or_else(|| {
                AppError::config(format!(
                    "Token lifetime of {} minutes is out of range",
                    minutes
                ))
            })?;

        Ok(Self::new(config.jwt_secret_bytes(), ttl))
    }

    /// Sign a token asserting `profile` for the configured lifetime.
    pub fn issue(&self, profile: &Profile) -> AppResult<TokenResponse> {
        self.issue_at(profile, Utc::now())
    }

    fn issue_at(&self, profile: &Profile, now: DateTime<Utc>) -> AppResult<TokenResponse> {
        let claims = Claims {
            sub: profile.subject.clone(),
            uid: profile.id,
            name: profile.name.clone(),
            role: profile.role,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .ok_or_else(|| AppError::internal("Token expiry out of range"))?
                .timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.ttl.num_minutes() * SECONDS_PER_MINUTE,
        })
    }

    /// Verify signature, then expiry, then rebuild the profile.
    ///
    /// # Errors
    /// `InvalidToken` for anything that fails the signature or claim shape,
    /// `ExpiredToken` for a correctly signed token past its `exp`.
    pub fn verify(&self, token: &str) -> AppResult<Profile> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.sub != claims.uid.to_string() {
            return Err(AppError::InvalidToken);
        }

        Ok(Profile::new(claims.uid, claims.name, claims.role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::minutes(30))
    }

    fn profile() -> Profile {
        Profile::new(42, "Ada Lovelace", Role::Admin)
    }

    /// Replace one character inside the payload segment.
    fn flip_payload_byte(token: &str) -> String {
        let payload_start = token.find('.').unwrap() + 1;
        let index = payload_start + 5;
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_issue_then_verify_round_trips() {
        let service = service();
        let issued = service.issue(&profile()).unwrap();

        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 30 * 60);

        let verified = service.verify(&issued.access_token).unwrap();
        assert_eq!(verified.subject, "42");
        assert_eq!(verified.id, 42);
        assert_eq!(verified.role, Role::Admin);
        assert_eq!(verified.name, "Ada Lovelace");
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let mut config = Config::new(
            std::str::from_utf8(SECRET).unwrap(),
            Default::default(),
            Default::default(),
        )
        .unwrap();
        config.jwt_expiration_minutes = 1_000_000_000_000;
        assert!(matches!(
            TokenService::from_config(&config),
            Err(AppError::Config(_))
        ));

        config.jwt_expiration_minutes = 200_000_000_000_000;
        assert!(matches!(
            TokenService::from_config(&config),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_expiry_overflow_fails_without_panicking() {
        let service = TokenService::new(SECRET, Duration::MAX);
        assert!(matches!(
            service.issue(&profile()),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service();
        let issued = service
            .issue_at(&profile(), Utc::now() - Duration::hours(2))
            .unwrap();

        let result = service.verify(&issued.access_token);
        assert!(matches!(result, Err(AppError::ExpiredToken)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let issued = service.issue(&profile()).unwrap();

        let result = service.verify(&flip_payload_byte(&issued.access_token));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let service = service();
        let issued = service
            .issue_at(&profile(), Utc::now() - Duration::hours(2))
            .unwrap();

        let result = service.verify(&flip_payload_byte(&issued.access_token));
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let other = TokenService::new(b"another-secret-key-that-is-32-chars!", Duration::minutes(30));
        let issued = other.issue(&profile()).unwrap();

        let result = service().verify(&issued.access_token);
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_mismatched_subject_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "7".to_string(),
            uid: 42,
            name: String::new(),
            role: Role::Admin,
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(service().verify(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = service();
        assert!(matches!(service.verify(""), Err(AppError::InvalidToken)));
        assert!(matches!(service.verify("a.b.c"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        // alg "none" header with a valid-looking payload and no signature
        let token = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.\
                     eyJzdWIiOiI0MiIsIm5hbWUiOiIiLCJyb2xlIjoiYWRtaW4iLCJpYXQiOjAsImV4cCI6OTk5OTk5OTk5OX0.";
        assert!(matches!(service().verify(token), Err(AppError::InvalidToken)));
    }
}
