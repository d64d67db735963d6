//! User handlers.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use super::auth_handler::SignupRequest;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Profile, PublicIdentity, Role};
use crate::errors::AppResult;
use crate::services::require_roles;

/// Create protected user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/signup/admin", post(create_admin))
        .route("/:id", get(get_user).delete(delete_user))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = PublicIdentity),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_current_user(
    Extension(profile): Extension<Profile>,
    State(state): State<AppState>,
) -> AppResult<Json<PublicIdentity>> {
    let identity = state.user_service.get_user(profile.id).await?;
    Ok(Json(PublicIdentity::from(identity)))
}

/// Get user by ID (admin only)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User", body = PublicIdentity),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(profile): Extension<Profile>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<PublicIdentity>> {
    require_roles(&profile, &[Role::Admin])?;
    let identity = state.user_service.get_user(id).await?;
    Ok(Json(PublicIdentity::from(identity)))
}

/// Delete user (admin only)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    Extension(profile): Extension<Profile>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    require_roles(&profile, &[Role::Admin])?;
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create an admin account (admin only)
#[utoipa::path(
    post,
    path = "/users/signup/admin",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Admin created", body = PublicIdentity),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_admin(
    Extension(profile): Extension<Profile>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<PublicIdentity>)> {
    let identity = state
        .auth_service
        .create_admin(&profile, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(PublicIdentity::from(identity))))
}
