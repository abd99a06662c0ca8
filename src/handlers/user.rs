use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::models::{UpdateUserStatusRequest, UserResponse};
use crate::services::UserService;
use crate::AppState;

/// List users (admin)
/// GET /api/users
pub async fn list(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = UserService::list_users(&state.db).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// Enable or disable an account (admin)
/// PUT /api/users/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserStatusRequest>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = UserService::update_user_status(&state.db, &id, req.is_active).await?;
    Ok(Json(ApiResponse::success(user)))
}
