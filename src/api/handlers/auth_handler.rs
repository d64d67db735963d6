//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Credentials, PublicIdentity, Registration};
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Account signup request.
///
/// Carries no role: public signups always become `user`. Credential and
/// name rules are enforced by the credential validator so every violation
/// lands in one response.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    /// Email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password (minimum 8 characters)
    #[schema(example = "password123", min_length = 8)]
    pub password: String,
    #[schema(example = "Jane", max_length = 100)]
    pub first_name: Option<String>,
    #[schema(example = "Doe", max_length = 100)]
    pub last_name: Option<String>,
}

impl From<SignupRequest> for Registration {
    fn from(request: SignupRequest) -> Self {
        Registration::new(Credentials::new(request.email, request.password))
            .with_names(request.first_name, request.last_name)
    }
}

/// User login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address
    #[validate(length(min = 1, message = "Email is required"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Create public authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered successfully", body = PublicIdentity),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<PublicIdentity>)> {
    let identity = state.auth_service.signup(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(PublicIdentity::from(identity))))
}

/// Login and get a signed token
#[utoipa::path(
    post,
    path = "/users/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(Credentials::new(payload.email, payload.password))
        .await?;

    Ok(Json(token))
}
