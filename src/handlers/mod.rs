pub mod auth;
pub mod director;
pub mod donation;
pub mod event;
pub mod gallery;
pub mod inquiry;
pub mod user;

use axum::extract::Multipart;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::services::{NotificationOutcome, Upload};

/// A record plus the delivery outcome of the notification it triggered
#[derive(Serialize)]
pub struct Notified<T: Serialize> {
    #[serde(flatten)]
    pub record: T,
    pub notification: NotificationOutcome,
}

/// Pull the named file field out of a multipart body. A request without
/// that field (or with an empty payload) is invalid input; nothing has
/// been touched yet at that point.
pub async fn read_upload(mut multipart: Multipart, field_name: &str) -> Result<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to process multipart: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field.file_name().map(|s| s.to_string());
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }

        return Ok(Upload {
            file_name,
            content_type,
            data,
        });
    }

    Err(AppError::InvalidInput(format!(
        "No '{}' file provided",
        field_name
    )))
}
