use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::handlers::read_upload;
use crate::models::{
    CreateGalleryItemRequest, GalleryItem, GalleryQuery, UpdateGalleryItemRequest,
};
use crate::services::GalleryService;
use crate::AppState;

/// List gallery items with optional category/media_type filters
/// GET /api/gallery
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<ApiResponse<Vec<GalleryItem>>>> {
    let (items, total, pagination) = GalleryService::list(&state.db, &query).await?;
    Ok(Json(ApiResponse::list(items, total, pagination)))
}

/// Get a gallery item
/// GET /api/gallery/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<GalleryItem>>> {
    let item = GalleryService::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Create a gallery item (media is attached through the upload routes)
/// POST /api/gallery
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateGalleryItemRequest>,
) -> Result<impl IntoResponse> {
    let item = GalleryService::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))))
}

/// Update a gallery item (partial)
/// PUT /api/gallery/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateGalleryItemRequest>,
) -> Result<Json<ApiResponse<GalleryItem>>> {
    let item = GalleryService::update(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Delete a gallery item and its media files
/// DELETE /api/gallery/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    GalleryService::delete(&state.db, &state.media, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Gallery item deleted")))
}

/// Upload or replace the item's main media
/// POST /api/gallery/:id/media
pub async fn upload_media(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<GalleryItem>>> {
    let upload = read_upload(multipart, "media").await?;
    let item = GalleryService::attach_media(&state.db, &state.media, &id, upload).await?;
    Ok(Json(ApiResponse::success(item)))
}

/// Upload or replace the item's thumbnail
/// POST /api/gallery/:id/thumbnail
pub async fn upload_thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<GalleryItem>>> {
    let upload = read_upload(multipart, "thumbnail").await?;
    let item = GalleryService::attach_thumbnail(&state.db, &state.media, &id, upload).await?;
    Ok(Json(ApiResponse::success(item)))
}
