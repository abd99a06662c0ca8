use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Pagination, Result};
use crate::models::{CreateDirectorRequest, Director, PageQuery, UpdateDirectorRequest};
use crate::services::media::{MediaLifecycle, Upload};

/// Director CRUD service
pub struct DirectorService;

impl DirectorService {
    /// List directors in manual display order
    pub async fn list(db: &Database, page: &PageQuery) -> Result<(Vec<Director>, i64, Pagination)> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM directors")
            .fetch_one(db.pool())
            .await?;

        let directors: Vec<Director> = sqlx::query_as(
            "SELECT * FROM directors ORDER BY display_order ASC, created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(page.limit() as i64)
        .bind(page.offset())
        .fetch_all(db.pool())
        .await?;

        let pagination = Pagination {
            page: page.page(),
            limit: page.limit(),
            pages: page.pages(total.0),
        };
        Ok((directors, total.0, pagination))
    }

    pub async fn get(db: &Database, id: &str) -> Result<Director> {
        let director: Director = sqlx::query_as("SELECT * FROM directors WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Director not found".to_string()))?;
        Ok(director)
    }

    pub async fn create(db: &Database, req: CreateDirectorRequest) -> Result<Director> {
        let now = Utc::now().to_rfc3339();
        let director = Director {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            position: req.position,
            bio: req.bio,
            email: req.email.trim().to_lowercase(),
            photo: String::new(),
            display_order: req.display_order,
            created_at: now.clone(),
            updated_at: now,
        };
        director.validate()?;

        sqlx::query(
            r#"
            INSERT INTO directors (id, name, position, bio, email, photo, display_order, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&director.id)
        .bind(&director.name)
        .bind(&director.position)
        .bind(&director.bio)
        .bind(&director.email)
        .bind(&director.photo)
        .bind(director.display_order)
        .bind(&director.created_at)
        .bind(&director.updated_at)
        .execute(db.pool())
        .await?;

        Self::get(db, &director.id).await
    }

    /// Partial update: unspecified fields keep their prior values
    pub async fn update(db: &Database, id: &str, req: UpdateDirectorRequest) -> Result<Director> {
        let mut director = Self::get(db, id).await?;

        if let Some(name) = req.name {
            director.name = name;
        }
        if let Some(position) = req.position {
            director.position = position;
        }
        if let Some(bio) = req.bio {
            director.bio = bio;
        }
        if let Some(email) = req.email {
            director.email = email.trim().to_lowercase();
        }
        if let Some(display_order) = req.display_order {
            director.display_order = display_order;
        }
        director.updated_at = Utc::now().to_rfc3339();
        director.validate()?;

        sqlx::query(
            r#"
            UPDATE directors
            SET name = ?, position = ?, bio = ?, email = ?, display_order = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&director.name)
        .bind(&director.position)
        .bind(&director.bio)
        .bind(&director.email)
        .bind(director.display_order)
        .bind(&director.updated_at)
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get(db, id).await
    }

    /// Delete a director and its photo file (photo cleanup is best-effort)
    pub async fn delete(db: &Database, media: &MediaLifecycle, id: &str) -> Result<()> {
        let director = Self::get(db, id).await?;

        media.delete_all(&[&director.photo]).await;

        sqlx::query("DELETE FROM directors WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(())
    }

    /// Replace the director's photo through the media lifecycle
    pub async fn attach_photo(
        db: &Database,
        media: &MediaLifecycle,
        id: &str,
        upload: Upload,
    ) -> Result<Director> {
        let director = Self::get(db, id).await?;

        media
            .attach("photos", upload, &director.photo, |new_ref| async move {
                let now = Utc::now().to_rfc3339();
                let result =
                    sqlx::query("UPDATE directors SET photo = ?, updated_at = ? WHERE id = ?")
                        .bind(&new_ref)
                        .bind(&now)
                        .bind(id)
                        .execute(db.pool())
                        .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::NotFound("Director not found".to_string()));
                }
                Ok(())
            })
            .await?;

        Self::get(db, id).await
    }
}
