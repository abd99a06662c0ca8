use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::models::{CreateEventRequest, Event, PageQuery, UpdateEventRequest};
use crate::services::EventService;
use crate::AppState;

/// List events
/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>> {
    let (events, total, pagination) = EventService::list(&state.db, &page).await?;
    Ok(Json(ApiResponse::list(events, total, pagination)))
}

/// Get an event
/// GET /api/events/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>> {
    let event = EventService::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(event)))
}

/// Create an event
/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse> {
    let event = EventService::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(event))))
}

/// Update an event (partial)
/// PUT /api/events/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<ApiResponse<Event>>> {
    let event = EventService::update(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(event)))
}

/// Delete an event
/// DELETE /api/events/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    EventService::delete(&state.db, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Event deleted")))
}
