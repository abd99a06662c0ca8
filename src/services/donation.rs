use chrono::Utc;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{AppError, Pagination, Result};
use crate::models::{CreateDonationRequest, Donation, DonationQuery, UpdateDonationRequest};
use crate::services::mailer::{Mailer, Notification, NotificationOutcome};

/// Donation CRUD service
pub struct DonationService;

impl DonationService {
    /// List donations, newest first, optionally filtered by status
    pub async fn list(db: &Database, query: &DonationQuery) -> Result<(Vec<Donation>, i64, Pagination)> {
        let page = query.page_query();

        let (total, donations): ((i64,), Vec<Donation>) = match &query.status {
            Some(status) => {
                let total = sqlx::query_as("SELECT COUNT(*) FROM donations WHERE status = ?")
                    .bind(status)
                    .fetch_one(db.pool())
                    .await?;
                let donations = sqlx::query_as(
                    "SELECT * FROM donations WHERE status = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(status)
                .bind(page.limit() as i64)
                .bind(page.offset())
                .fetch_all(db.pool())
                .await?;
                (total, donations)
            }
            None => {
                let total = sqlx::query_as("SELECT COUNT(*) FROM donations")
                    .fetch_one(db.pool())
                    .await?;
                let donations = sqlx::query_as(
                    "SELECT * FROM donations ORDER BY created_at DESC LIMIT ? OFFSET ?",
                )
                .bind(page.limit() as i64)
                .bind(page.offset())
                .fetch_all(db.pool())
                .await?;
                (total, donations)
            }
        };

        let pagination = Pagination {
            page: page.page(),
            limit: page.limit(),
            pages: page.pages(total.0),
        };
        Ok((donations, total.0, pagination))
    }

    pub async fn get(db: &Database, id: &str) -> Result<Donation> {
        let donation: Donation = sqlx::query_as("SELECT * FROM donations WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("Donation not found".to_string()))?;
        Ok(donation)
    }

    /// Record a donation, then send the receipt. The donation is persisted
    /// first; the delivery outcome is reported separately and never rolls
    /// the record back.
    pub async fn create(
        db: &Database,
        mailer: &Mailer,
        req: CreateDonationRequest,
    ) -> Result<(Donation, NotificationOutcome)> {
        let now = Utc::now().to_rfc3339();
        let donation = Donation {
            id: Uuid::new_v4().to_string(),
            donor_name: req.donor_name,
            donor_email: req.donor_email.trim().to_lowercase(),
            amount: req.amount,
            currency: req.currency,
            message: req.message,
            status: "pending".to_string(),
            created_at: now.clone(),
            updated_at: now,
        };
        donation.validate()?;

        sqlx::query(
            r#"
            INSERT INTO donations (id, donor_name, donor_email, amount, currency, message, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&donation.id)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount)
        .bind(&donation.currency)
        .bind(&donation.message)
        .bind(&donation.status)
        .bind(&donation.created_at)
        .bind(&donation.updated_at)
        .execute(db.pool())
        .await?;

        let donation = Self::get(db, &donation.id).await?;

        let outcome = mailer
            .send(
                &donation.donor_email,
                Notification::DonationReceipt {
                    donor_name: donation.donor_name.clone(),
                    amount: donation.amount,
                    currency: donation.currency.clone(),
                    date: donation.created_at.clone(),
                },
            )
            .await;

        Ok((donation, outcome))
    }

    /// Partial update: unspecified fields keep their prior values
    pub async fn update(db: &Database, id: &str, req: UpdateDonationRequest) -> Result<Donation> {
        let mut donation = Self::get(db, id).await?;

        if let Some(donor_name) = req.donor_name {
            donation.donor_name = donor_name;
        }
        if let Some(donor_email) = req.donor_email {
            donation.donor_email = donor_email.trim().to_lowercase();
        }
        if let Some(amount) = req.amount {
            donation.amount = amount;
        }
        if let Some(currency) = req.currency {
            donation.currency = currency;
        }
        if let Some(message) = req.message {
            donation.message = message;
        }
        if let Some(status) = req.status {
            donation.status = status;
        }
        donation.updated_at = Utc::now().to_rfc3339();
        donation.validate()?;

        sqlx::query(
            r#"
            UPDATE donations
            SET donor_name = ?, donor_email = ?, amount = ?, currency = ?, message = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount)
        .bind(&donation.currency)
        .bind(&donation.message)
        .bind(&donation.status)
        .bind(&donation.updated_at)
        .bind(id)
        .execute(db.pool())
        .await?;

        Self::get(db, id).await
    }

    pub async fn delete(db: &Database, id: &str) -> Result<()> {
        Self::get(db, id).await?;

        sqlx::query("DELETE FROM donations WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpConfig;

    async fn test_db() -> (Database, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        db.run_migrations().await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn donation_is_persisted_even_when_delivery_fails() {
        let (db, _dir) = test_db().await;
        let mailer = Mailer::from_config(&SmtpConfig::default());

        let (donation, outcome) = DonationService::create(
            &db,
            &mailer,
            CreateDonationRequest {
                donor_name: "Sam".to_string(),
                donor_email: "Sam@Example.org".to_string(),
                amount: 25.0,
                currency: "USD".to_string(),
                message: "Keep it up".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(!outcome.delivered);
        assert_eq!(donation.status, "pending");
        assert_eq!(donation.donor_email, "sam@example.org");

        let fetched = DonationService::get(&db, &donation.id).await.unwrap();
        assert_eq!(fetched, donation);
    }

    #[tokio::test]
    async fn status_filter_and_transition() {
        let (db, _dir) = test_db().await;
        let mailer = Mailer::from_config(&SmtpConfig::default());

        let (donation, _) = DonationService::create(
            &db,
            &mailer,
            CreateDonationRequest {
                donor_name: "Sam".to_string(),
                donor_email: "sam@example.org".to_string(),
                amount: 25.0,
                currency: "USD".to_string(),
                message: String::new(),
            },
        )
        .await
        .unwrap();

        let updated = DonationService::update(
            &db,
            &donation.id,
            UpdateDonationRequest {
                status: Some("completed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, "completed");
        assert_eq!(updated.amount, donation.amount);

        let (completed, total, _) = DonationService::list(
            &db,
            &DonationQuery {
                status: Some("completed".to_string()),
                page: None,
                limit: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(total, 1);
        assert_eq!(completed[0].id, donation.id);

        let err = DonationService::update(
            &db,
            &donation.id,
            UpdateDonationRequest {
                status: Some("laundered".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }
}
