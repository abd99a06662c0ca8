use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Pagination, Result};
use crate::models::{
    CreateGalleryItemRequest, GalleryItem, GalleryQuery, MediaType, UpdateGalleryItemRequest,
};
use crate::services::media::{MediaLifecycle, Upload};

/// Gallery CRUD service
pub struct GalleryService;

impl GalleryService {
    /// List gallery items, newest first, with exact-match filters
    pub async fn list(db: &Database, query: &GalleryQuery) -> Result<(Vec<GalleryItem>, i64, Pagination)> {
        let page = query.page_query();

        let (total, items): ((i64,), Vec<GalleryItem>) =
            match (&query.category, &query.media_type) {
                (Some(category), Some(media_type)) => {
                    let total = sqlx::query_as(
                        "SELECT COUNT(*) FROM gallery_items WHERE category = ? AND media_type = ?",
                    )
                    .bind(category)
                    .bind(media_type)
                    .fetch_one(db.pool())
                    .await?;
                    let items = sqlx::query_as(
                        "SELECT * FROM gallery_items WHERE category = ? AND media_type = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(category)
                    .bind(media_type)
                    .bind(page.limit() as i64)
                    .bind(page.offset())
                    .fetch_all(db.pool())
                    .await?;
                    (total, items)
                }
                (Some(category), None) => {
                    let total =
                        sqlx::query_as("SELECT COUNT(*) FROM gallery_items WHERE category = ?")
                            .bind(category)
                            .fetch_one(db.pool())
                            .await?;
                    let items = sqlx::query_as(
                        "SELECT * FROM gallery_items WHERE category = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(category)
                    .bind(page.limit() as i64)
                    .bind(page.offset())
                    .fetch_all(db.pool())
                    .await?;
                    (total, items)
                }
                (None, Some(media_type)) => {
                    let total =
                        sqlx::query_as("SELECT COUNT(*) FROM gallery_items WHERE media_type = ?")
                            .bind(media_type)
                            .fetch_one(db.pool())
                            .await?;
                    let items = sqlx::query_as(
                        "SELECT * FROM gallery_items WHERE media_type = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(media_type)
                    .bind(page.limit() as i64)
                    .bind(page.offset())
                    .fetch_all(db.pool())
                    .await?;
                    (total, items)
                }
                (None, None) => {
                    let total = sqlx::query_as("SELECT COUNT(*) FROM gallery_items")
                        .fetch_one(db.pool())
                        .await?;
                    let items = sqlx::query_as(
                        "SELECT * FROM gallery_items ORDER BY created_at DESC LIMIT ? OFFSET ?",
                    )
                    .bind(page.limit() as i64)
                    .bind(page.offset())
                    .fetch_all(db.pool())
                    .await?;
                    (total, items)
                }
            };

        let pagination = Pagination {
            page: page.page(),
            limit: page.limit(),
            pages: page.pages(total.0),
        };
        Ok((items, total.0, pagination))
    }

    pub async fn get(db: &Database, id: &str) -> Result<GalleryItem> {
        let item: GalleryItem = sqlx::query_as("SELECT * FROM gallery_items WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Gallery item not found".to_string()))?;
        Ok(item)
    }

    pub async fn create(db: &Database, req: CreateGalleryItemRequest) -> Result<GalleryItem> {
        let now = Utc::now().to_rfc3339();
        let item = GalleryItem {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            category: req.category,
            media_type: req.media_type,
            media_url: String::new(),
            thumbnail_url: String::new(),
            created_at: now.clone(),
            updated_at: now,
        };
        item.validate()?;

        sqlx::query(
            r#"
            INSERT INTO gallery_items (id, title, description, category, media_type, media_url, thumbnail_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.media_type)
        .bind(&item.media_url)
        .bind(&item.thumbnail_url)
        .bind(&item.created_at)
        .bind(&item.updated_at)
        .execute(db.pool())
        .await?;

        Self::get(db, &item.id).await
    }

    /// Partial update: unspecified fields keep their prior values
    pub async fn update(db: &Database, id: &str, req: UpdateGalleryItemRequest) -> Result<GalleryItem> {
        let mut item = Self::get(db, id).await?;

        if let Some(title) = req.title {
            item.title = title;
        }
        if let Some(description) = req.description {
            item.description = description;
        }
        if let Some(category) = req.category {
            item.category = category;
        }
        if let Some(media_type) = req.media_type {
            item.media_type = media_type;
        }
        item.updated_at = Utc::now().to_rfc3339();
        item.validate()?;

        sqlx::query(
            r#"
            UPDATE gallery_items
            SET title = ?, description = ?, category = ?, media_type = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.title)
        .bind(&item.description)
        .bind(&item.category)
        .bind(&item.media_type)
        .bind(&item.updated_at)
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get(db, id).await
    }

    /// Delete a gallery item and both of its media files
    pub async fn delete(db: &Database, media: &MediaLifecycle, id: &str) -> Result<()> {
        let item = Self::get(db, id).await?;

        media.delete_all(&[&item.media_url, &item.thumbnail_url]).await;

        sqlx::query("DELETE FROM gallery_items WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(())
    }

    /// Replace the item's main media. The stored media type follows the
    /// uploaded payload's declared content type, not the prior value.
    pub async fn attach_media(
        db: &Database,
        media: &MediaLifecycle,
        id: &str,
        upload: Upload,
    ) -> Result<GalleryItem> {
        let item = Self::get(db, id).await?;

        let media_type = MediaType::from_content_type(upload.content_type());
        let subdir = media_type.subdir();

        media
            .attach(subdir, upload, &item.media_url, |new_ref| async move {
                let now = Utc::now().to_rfc3339();
                let result = sqlx::query(
                    "UPDATE gallery_items SET media_url = ?, media_type = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&new_ref)
                .bind(media_type.as_str())
                .bind(&now)
                .bind(id)
                .execute(db.pool())
                .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound("Gallery item not found".to_string()));
                }
                Ok(())
            })
            .await?;

        Self::get(db, id).await
    }

    /// Replace the item's thumbnail
    pub async fn attach_thumbnail(
        db: &Database,
        media: &MediaLifecycle,
        id: &str,
        upload: Upload,
    ) -> Result<GalleryItem> {
        let item = Self::get(db, id).await?;

        media
            .attach("thumbnails", upload, &item.thumbnail_url, |new_ref| async move {
                let now = Utc::now().to_rfc3339();
                let result = sqlx::query(
                    "UPDATE gallery_items SET thumbnail_url = ?, updated_at = ? WHERE id = ?",
                )
                .bind(&new_ref)
                .bind(&now)
                .bind(id)
                .execute(db.pool())
                .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound("Gallery item not found".to_string()));
                }
                Ok(())
            })
            .await?;

        Self::get(db, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::Arc;

    use crate::storage::LocalMediaStore;
    use crate::storage::store::MediaStore;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        db.run_migrations().await.unwrap();
        (db, dir)
    }

    fn create_req(title: &str, category: &str) -> CreateGalleryItemRequest {
        CreateGalleryItemRequest {
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            media_type: "image".to_string(),
        }
    }

    #[tokio::test]
    async fn filtered_pagination_scenario() {
        let (db, _dir) = test_db().await;

        // 25 matching records plus noise in another category
        for i in 0..25 {
            GalleryService::create(&db, create_req(&format!("Item {:02}", i), "events"))
                .await
                .unwrap();
        }
        for i in 0..5 {
            GalleryService::create(&db, create_req(&format!("Other {}", i), "community"))
                .await
                .unwrap();
        }

        let (items, total, pagination) = GalleryService::list(
            &db,
            &GalleryQuery {
                category: Some("events".to_string()),
                media_type: None,
                page: Some(2),
                limit: Some(12),
            },
        )
        .await
        .unwrap();

        assert_eq!(total, 25);
        assert_eq!(pagination.pages, 3);
        assert_eq!(items.len(), 12);
        assert!(items.iter().all(|i| i.category == "events"));
    }

    #[tokio::test]
    async fn media_upload_forces_media_type_from_content_type() {
        let (db, _dir) = test_db().await;
        let store_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::new(store_dir.path()));
        let media = MediaLifecycle::new(store, "/uploads");

        // Declared as video in metadata, but the payload is an image
        let mut req = create_req("X", "events");
        req.media_type = "video".to_string();
        let item = GalleryService::create(&db, req).await.unwrap();

        let updated = GalleryService::attach_media(
            &db,
            &media,
            &item.id,
            Upload {
                file_name: Some("photo.png".to_string()),
                content_type: Some("image/png".to_string()),
                data: Bytes::from_static(b"png"),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.media_type, "image");
        assert!(updated.media_url.starts_with("/uploads/images/"));
    }

    #[tokio::test]
    async fn thumbnail_and_media_are_deleted_with_the_item() {
        let (db, _dir) = test_db().await;
        let store_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalMediaStore::new(store_dir.path()));
        let media = MediaLifecycle::new(store.clone(), "/uploads");

        let item = GalleryService::create(&db, create_req("X", "events")).await.unwrap();
        let item = GalleryService::attach_media(
            &db,
            &media,
            &item.id,
            Upload {
                file_name: Some("clip.mp4".to_string()),
                content_type: Some("video/mp4".to_string()),
                data: Bytes::from_static(b"vid"),
            },
        )
        .await
        .unwrap();
        let item = GalleryService::attach_thumbnail(
            &db,
            &media,
            &item.id,
            Upload {
                file_name: Some("thumb.jpg".to_string()),
                content_type: Some("image/jpeg".to_string()),
                data: Bytes::from_static(b"thumb"),
            },
        )
        .await
        .unwrap();

        assert_eq!(item.media_type, "video");
        assert!(item.media_url.starts_with("/uploads/videos/"));
        assert!(item.thumbnail_url.starts_with("/uploads/thumbnails/"));

        let media_rel = media.resolve(&item.media_url).unwrap();
        let thumb_rel = media.resolve(&item.thumbnail_url).unwrap();

        GalleryService::delete(&db, &media, &item.id).await.unwrap();
        assert!(!store.exists(&media_rel).await.unwrap());
        assert!(!store.exists(&thumb_rel).await.unwrap());
    }

    #[tokio::test]
    async fn partial_update_preserves_media_references() {
        let (db, _dir) = test_db().await;
        let item = GalleryService::create(&db, create_req("Before", "events")).await.unwrap();

        let updated = GalleryService::update(
            &db,
            &item.id,
            UpdateGalleryItemRequest {
                title: Some("After".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.category, item.category);
        assert_eq!(updated.media_url, item.media_url);
        assert_eq!(updated.thumbnail_url, item.thumbnail_url);
    }
}
