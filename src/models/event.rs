use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Organization event
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Event {
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut fields = Vec::new();
        if self.title.trim().is_empty() {
            fields.push("title");
        }
        if chrono::DateTime::parse_from_rfc3339(&self.event_date).is_err() {
            fields.push("event_date");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::error::AppError::validation(fields))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub event_date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_date_is_rejected() {
        let event = Event {
            id: "e1".to_string(),
            title: "Fundraiser".to_string(),
            description: String::new(),
            location: String::new(),
            event_date: "next tuesday".to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let err = event.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: event_date");
    }
}
