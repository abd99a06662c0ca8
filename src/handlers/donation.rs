use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, Result};
use crate::handlers::Notified;
use crate::models::{CreateDonationRequest, Donation, DonationQuery, UpdateDonationRequest};
use crate::services::DonationService;
use crate::AppState;

/// List donations (admin)
/// GET /api/donations
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> Result<Json<ApiResponse<Vec<Donation>>>> {
    let (donations, total, pagination) = DonationService::list(&state.db, &query).await?;
    Ok(Json(ApiResponse::list(donations, total, pagination)))
}

/// Get a donation (admin)
/// GET /api/donations/:id
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Donation>>> {
    let donation = DonationService::get(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(donation)))
}

/// Record a donation (public form). The receipt email outcome is reported
/// alongside the record, never as the primary result.
/// POST /api/donations
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateDonationRequest>,
) -> Result<impl IntoResponse> {
    let (donation, notification) = DonationService::create(&state.db, &state.mailer, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Notified {
            record: donation,
            notification,
        })),
    ))
}

/// Update a donation (partial, admin)
/// PUT /api/donations/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDonationRequest>,
) -> Result<Json<ApiResponse<Donation>>> {
    let donation = DonationService::update(&state.db, &id, req).await?;
    Ok(Json(ApiResponse::success(donation)))
}

/// Delete a donation (admin)
/// DELETE /api/donations/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    DonationService::delete(&state.db, &id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Donation deleted")))
}
