//! Authentication routes: register, login, logout, profile.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{RegisterUser, UserResponse};
use crate::services::auth::{self as auth_service, AuthResponse};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUser>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let auth = auth_service::register(
        &state.store,
        body,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(auth))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let auth = auth_service::login(
        &state.store,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        state.config.jwt_access_token_expiry_secs,
    )
    .await?;

    Ok(ApiResponse::success(auth))
}

/// POST /api/auth/logout: client-side token discard (stateless JWT)
pub async fn logout() -> Json<ApiResponse<&'static str>> {
    ApiResponse::success("Logged out successfully")
}

/// GET /api/auth/me: current user profile
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = auth_service::find_user_by_id(&state.store, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
