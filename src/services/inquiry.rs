use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Pagination, Result};
use crate::models::{
    CreateInquiryRequest, Inquiry, InquiryQuery, RespondInquiryRequest, UpdateInquiryRequest,
};
use crate::services::mailer::{Mailer, Notification, NotificationOutcome};

/// Inquiry CRUD service
pub struct InquiryService;

impl InquiryService {
    /// List inquiries, newest first, optionally filtered by status
    pub async fn list(db: &Database, query: &InquiryQuery) -> Result<(Vec<Inquiry>, i64, Pagination)> {
        let page = query.page_query();

        let (total, inquiries): ((i64,), Vec<Inquiry>) = match &query.status {
            Some(status) => {
                let total = sqlx::query_as("SELECT COUNT(*) FROM inquiries WHERE status = ?")
                    .bind(status)
                    .fetch_one(db.pool())
                    .await?;
                let inquiries = sqlx::query_as(
                    "SELECT * FROM inquiries WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(status)
                .bind(page.limit() as i64)
                .bind(page.offset())
                .fetch_all(db.pool())
                .await?;
                (total, inquiries)
            }
            None => {
                let total = sqlx::query_as("SELECT COUNT(*) FROM inquiries")
                    .fetch_one(db.pool())
                    .await?;
                let inquiries = sqlx::query_as(
                    "SELECT * FROM inquiries ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(page.limit() as i64)
                .bind(page.offset())
                .fetch_all(db.pool())
                .await?;
                (total, inquiries)
            }
        };

        let pagination = Pagination {
            page: page.page(),
            limit: page.limit(),
            pages: page.pages(total.0),
        };
        Ok((inquiries, total.0, pagination))
    }

    pub async fn get(db: &Database, id: &str) -> Result<Inquiry> {
        let inquiry: Inquiry = sqlx::query_as("SELECT * FROM inquiries WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;
        Ok(inquiry)
    }

    pub async fn create(db: &Database, req: CreateInquiryRequest) -> Result<Inquiry> {
        let now = Utc::now().to_rfc3339();
        let inquiry = Inquiry {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            email: req.email.trim().to_lowercase(),
            subject: req.subject,
            message: req.message,
            status: "new".to_string(),
            response: String::new(),
            created_at: now.clone(),
            updated_at: now,
        };
        inquiry.validate()?;

        sqlx::query(
            r#"
            INSERT INTO inquiries (id, name, email, subject, message, status, response, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inquiry.id)
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(&inquiry.status)
        .bind(&inquiry.response)
        .bind(&inquiry.created_at)
        .bind(&inquiry.updated_at)
        .execute(db.pool())
        .await?;

        Self::get(db, &inquiry.id).await
    }

    /// Partial update: unspecified fields keep their prior values
    pub async fn update(db: &Database, id: &str, req: UpdateInquiryRequest) -> Result<Inquiry> {
        let mut inquiry = Self::get(db, id).await?;

        if let Some(name) = req.name {
            inquiry.name = name;
        }
        if let Some(email) = req.email {
            inquiry.email = email.trim().to_lowercase();
        }
        if let Some(subject) = req.subject {
            inquiry.subject = subject;
        }
        if let Some(message) = req.message {
            inquiry.message = message;
        }
        if let Some(status) = req.status {
            inquiry.status = status;
        }
        inquiry.updated_at = Utc::now().to_rfc3339();
        inquiry.validate()?;

        sqlx::query(
            r#"
            UPDATE inquiries
            SET name = ?, email = ?, subject = ?, message = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&inquiry.name)
        .bind(&inquiry.email)
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(&inquiry.status)
        .bind(&inquiry.updated_at)
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get(db, id).await
    }

    /// Save the admin reply, mark the inquiry responded, then email the
    /// reply to the submitter. The reply is persisted before delivery is
    /// attempted; the outcome is reported separately.
    pub async fn respond(
        db: &Database,
        mailer: &Mailer,
        id: &str,
        req: RespondInquiryRequest,
    ) -> Result<(Inquiry, NotificationOutcome)> {
        if req.response.trim().is_empty() {
            return Err(AppError::InvalidInput("Response text is required".to_string()));
        }

        let inquiry = Self::get(db, id).await?;

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE inquiries SET response = ?, status = 'responded', updated_at = ? WHERE id = ?",
        )
        .bind(&req.response)
        .bind(&now)
        .bind(id)
        .execute(db.pool())
        .await?;

        let inquiry = Self::get(db, id).await?;

        let outcome = mailer
            .send(
                &inquiry.email,
                Notification::InquiryResponse {
                    name: inquiry.name.clone(),
                    subject: inquiry.subject.clone(),
                    response: req.response,
                },
            )
            .await;

        Ok((inquiry, outcome))
    }

    pub async fn delete(db: &Database, id: &str) -> Result<()> {
        Self::get(db, id).await?;

        sqlx::query("DELETE FROM inquiries WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(())
    }
}
