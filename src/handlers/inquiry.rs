use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::handlers::Notified;
use crate::models::{
    CreateInquiryRequest, Inquiry, InquiryQuery, RespondInquiryRequest, UpdateInquiryRequest,
};
use crate::services::InquiryService;
use crate::AppState;

/// List inquiries (admin)
/// GET /api/inquiries
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<InquiryQuery>,
) -> Result<Json<ApiResponse<Vec<Inquiry>>>> {
    let (inquiries, total, pagination) = InquiryService::list(&state.db, &query).await?;
    Ok(Json(ApiResponse::list(inquiries, total, pagination)))
}

/// Get an inquiry (admin)
/// GET /api/inquiries/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Inquiry>>> {
    let inquiry = InquiryService::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(inquiry)))
}

/// Submit an inquiry (public form)
/// POST /api/inquiries
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateInquiryRequest>,
) -> Result<impl IntoResponse> {
    let inquiry = InquiryService::create(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(inquiry))))
}

/// Update an inquiry (partial, admin)
/// PUT /api/inquiries/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateInquiryRequest>,
) -> Result<Json<ApiResponse<Inquiry>>> {
    let inquiry = InquiryService::update(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(inquiry)))
}

/// Reply to an inquiry and email the submitter (admin)
/// PUT /api/inquiries/:id/respond
pub async fn respond(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RespondInquiryRequest>,
) -> Result<Json<ApiResponse<Notified<Inquiry>>>> {
    let (inquiry, notification) =
        InquiryService::respond(&state.db, &state.mailer, &id, req).await?;
    Ok(Json(ApiResponse::success(Notified {
        record: inquiry,
        notification,
    })))
}

/// Delete an inquiry (admin)
/// DELETE /api/inquiries/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    InquiryService::delete(&state.db, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Inquiry deleted")))
}
