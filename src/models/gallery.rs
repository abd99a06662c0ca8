use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Media kind for a gallery item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }

    /// Inferred from the uploaded payload's declared content type,
    /// never from user-supplied metadata.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("image/") {
            MediaType::Image
        } else {
            MediaType::Video
        }
    }

    /// Subdirectory of the uploads root that files of this kind land in
    pub fn subdir(&self) -> &'static str {
        match self {
            MediaType::Image => "images",
            MediaType::Video => "videos",
        }
    }
}

pub const GALLERY_CATEGORIES: &[&str] = &["events", "programs", "community", "general"];

/// Gallery item. `media_url` and `thumbnail_url` are media references
/// (empty when unset).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct GalleryItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub media_type: String,
    pub media_url: String,
    pub thumbnail_url: String,
    pub created_at: String,
    pub updated_at: String,
}

impl GalleryItem {
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut fields = Vec::new();
        if self.title.trim().is_empty() {
            fields.push("title");
        }
        if !GALLERY_CATEGORIES.contains(&self.category.as_str()) {
            fields.push("category");
        }
        if MediaType::parse(&self.media_type).is_none() {
            fields.push("media_type");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::error::AppError::validation(fields))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGalleryItemRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_media_type() -> String {
    "image".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateGalleryItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub media_type: Option<String>,
}

/// List filters (exact-match) plus pagination
#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub category: Option<String>,
    pub media_type: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl GalleryQuery {
    pub fn page_query(&self) -> super::PageQuery {
        super::PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}
