//! Listing routes, shared by items, jobs and campaigns.

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::db::Stored;
use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::services::listing::{self as listing_service, Actor};
use crate::AppState;

/// Routes for one listing type under `/api/{plural}`.
pub fn routes<L: Stored>() -> Router<AppState> {
    let base = format!("/api/{}", L::KIND.plural);
    Router::new()
        .route(&base, get(list::<L>).post(create::<L>))
        .route(&format!("{base}/user/{{user_id}}"), get(list_by_owner::<L>))
        .route(&format!("{base}/stats/{{user_id}}"), get(stats::<L>))
        .route(&format!("{base}/{{id}}"), put(update::<L>).delete(delete::<L>))
}

fn actor(user: &CurrentUser) -> Actor {
    Actor {
        id: user.id,
        is_admin: user.is_admin(),
    }
}

/// GET /api/{kind}: every listing, newest first.
pub async fn list<L: Stored>(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<L>>>, AppError> {
    Ok(ApiResponse::success(listing_service::list_all::<L>(&state.store).await))
}

/// GET /api/{kind}/user/:user_id
pub async fn list_by_owner<L: Stored>(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<L>>>, AppError> {
    let listings = listing_service::list_by_owner::<L>(&state.store, user_id).await;
    Ok(ApiResponse::success(listings))
}

/// GET /api/{kind}/stats/:user_id
pub async fn stats<L: Stored>(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiResponse<L::Stats>>, AppError> {
    let stats = listing_service::stats_for_owner::<L>(&state.store, user_id).await;
    Ok(ApiResponse::success(stats))
}

/// POST /api/{kind}: the caller becomes the owner.
pub async fn create<L: Stored>(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<L::Draft>,
) -> Result<Json<ApiResponse<L>>, AppError> {
    let listing = listing_service::create::<L>(&state.store, &current_user.owner(), body).await?;
    Ok(ApiResponse::success(listing))
}

/// PUT /api/{kind}/:id: owner or admin.
pub async fn update<L: Stored>(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<L::Patch>,
) -> Result<Json<ApiResponse<L>>, AppError> {
    let listing = listing_service::update::<L>(&state.store, id, actor(&current_user), body).await?;
    Ok(ApiResponse::success(listing))
}

/// DELETE /api/{kind}/:id: owner or admin.
pub async fn delete<L: Stored>(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    listing_service::delete::<L>(&state.store, id, actor(&current_user)).await?;
    Ok(ApiResponse::success(format!("{} deleted successfully", L::KIND.noun)))
}
