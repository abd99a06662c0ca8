use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Pagination, Result};
use crate::models::{CreateEventRequest, Event, PageQuery, UpdateEventRequest};

/// Event CRUD service
pub struct EventService;

impl EventService {
    /// List events, newest first
    pub async fn list(db: &Database, page: &PageQuery) -> Result<(Vec<Event>, i64, Pagination)> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(db.pool())
            .await?;

        let events: Vec<Event> =
            sqlx::query_as("SELECT * FROM events ORDER BY created_at DESC LIMIT ? OFFSET ?")
                .bind(page.limit() as i64)
                .bind(page.offset())
                .fetch_all(db.pool())
                .await?;

        let pagination = Pagination {
            page: page.page(),
            limit: page.limit(),
            pages: page.pages(total.0),
        };
        Ok((events, total.0, pagination))
    }

    pub async fn get(db: &Database, id: &str) -> Result<Event> {
        let event: Event = sqlx::query_as("SELECT * FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
        Ok(event)
    }

    pub async fn create(db: &Database, req: CreateEventRequest) -> Result<Event> {
        let now = Utc::now().to_rfc3339();
        let event = Event {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            location: req.location,
            event_date: req.event_date,
            created_at: now.clone(),
            updated_at: now,
        };
        event.validate()?;

        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, location, event_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.event_date)
        .bind(&event.created_at)
        .bind(&event.updated_at)
        .execute(db.pool())
        .await?;

        Self::get(db, &event.id).await
    }

    /// Partial update: unspecified fields keep their prior values
    pub async fn update(db: &Database, id: &str, req: UpdateEventRequest) -> Result<Event> {
        let mut event = Self::get(db, id).await?;

        if let Some(title) = req.title {
            event.title = title;
        }
        if let Some(description) = req.description {
            event.description = description;
        }
        if let Some(location) = req.location {
            event.location = location;
        }
        if let Some(event_date) = req.event_date {
            event.event_date = event_date;
        }
        event.updated_at = Utc::now().to_rfc3339();
        event.validate()?;

        sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, location = ?, event_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(&event.location)
        .bind(&event.event_date)
        .bind(&event.updated_at)
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get(db, id).await
    }

    pub async fn delete(db: &Database, id: &str) -> Result<()> {
        Self::get(db, id).await?;

        sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        db.run_migrations().await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn create_validates_the_date() {
        let (db, _dir) = test_db().await;
        let err = EventService::create(
            &db,
            CreateEventRequest {
                title: "Gala".to_string(),
                description: String::new(),
                location: "Town hall".to_string(),
                event_date: "soon".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn update_merges_partially() {
        let (db, _dir) = test_db().await;
        let created = EventService::create(
            &db,
            CreateEventRequest {
                title: "Gala".to_string(),
                description: "Annual".to_string(),
                location: "Town hall".to_string(),
                event_date: "2026-09-01T18:00:00+00:00".to_string(),
            },
        )
        .await
        .unwrap();

        let updated = EventService::update(
            &db,
            &created.id,
            UpdateEventRequest {
                location: Some("Main square".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.location, "Main square");
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.event_date, created.event_date);
    }
}
