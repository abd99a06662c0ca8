use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::handlers::read_upload;
use crate::models::{CreateDirectorRequest, Director, PageQuery, UpdateDirectorRequest};
use crate::services::DirectorService;
use crate::AppState;

/// List directors
/// GET /api/directors
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Director>>>> {
    let (directors, total, pagination) = DirectorService::list(&state.db, &page).await?;
    Ok(Json(ApiResponse::list(directors, total, pagination)))
}

/// Get a director
/// GET /api/directors/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Director>>> {
    let director = DirectorService::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(director)))
}

/// Create a director
/// POST /api/directors
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateDirectorRequest>,
) -> Result<impl IntoResponse> {
    let director = DirectorService::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(director))))
}

/// Update a director (partial)
/// PUT /api/directors/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDirectorRequest>,
) -> Result<Json<ApiResponse<Director>>> {
    let director = DirectorService::update(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(director)))
}

/// Delete a director and its photo
/// DELETE /api/directors/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    DirectorService::delete(&state.db, &state.media, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Director deleted")))
}

/// Upload or replace the director's photo
/// POST /api/directors/:id/photo
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Director>>> {
    let upload = read_upload(multipart, "photo").await?;
    let director = DirectorService::attach_photo(&state.db, &state.media, &id, upload).await?;
    Ok(Json(ApiResponse::success(director)))
}
