use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const INQUIRY_STATUSES: &[&str] = &["new", "responded", "closed"];

/// Contact-form inquiry
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Inquiry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub response: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Inquiry {
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push("name");
        }
        if !super::is_email(&self.email) {
            fields.push("email");
        }
        if self.subject.trim().is_empty() {
            fields.push("subject");
        }
        if self.message.trim().is_empty() {
            fields.push("message");
        }
        if !INQUIRY_STATUSES.contains(&self.status.as_str()) {
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
pub struct CreateInquiryRequest {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInquiryRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub status: Option<String>,
}

/// Admin reply to an inquiry
#[derive(Debug, Deserialize)]
pub struct RespondInquiryRequest {
    pub response: String,
}

/// List filter plus pagination
#[derive(Debug, Deserialize)]
pub struct InquiryQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl InquiryQuery {
    pub fn page_query(&self) -> super::PageQuery {
        super::PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}
