use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DONATION_STATUSES: &[&str] = &["pending", "completed", "failed"];

/// Donation record
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Donation {
    pub id: String,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    pub currency: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Donation {
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut fields = Vec::new();
        if self.donor_name.trim().is_empty() {
            fields.push("donor_name");
        }
        if !super::is_email(&self.donor_email) {
            fields.push("donor_email");
        }
        if !(self.amount > 0.0) {
            fields.push("amount");
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            fields.push("currency");
        }
        if !DONATION_STATUSES.contains(&self.status.as_str()) {
            fields.push("status");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::error::AppError::validation(fields))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDonationRequest {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub message: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDonationRequest {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// List filter plus pagination
#[derive(Debug, Deserialize)]
pub struct DonationQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl DonationQuery {
    pub fn page_query(&self) -> super::PageQuery {
        super::PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation() -> Donation {
        Donation {
            id: "dn1".to_string(),
            donor_name: "Sam Lee".to_string(),
            donor_email: "sam@example.org".to_string(),
            amount: 50.0,
            currency: "USD".to_string(),
            message: String::new(),
            status: "pending".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut d = donation();
        d.amount = 0.0;
        let err = d.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: amount");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut d = donation();
        d.status = "refunded".to_string();
        assert!(d.validate().is_err());
    }
}
