use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Board/staff director. `photo` is a media reference (empty when unset);
/// `display_order` is the manual sort key, ascending.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Director {
    pub id: String,
    pub name: String,
    pub position: String,
    pub bio: String,
    pub email: String,
    pub photo: String,
    pub display_order: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Director {
    /// Field-rule validation on the full (merged) record
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut fields = Vec::new();
        if self.name.trim().is_empty() {
            fields.push("name");
        }
        if self.position.trim().is_empty() {
            fields.push("position");
        }
        if !self.email.is_empty() && !is_email(&self.email) {
            fields.push("email");
        }
        if fields.is_empty() {
            Ok(())
        } else {
            Err(crate::error::AppError::validation(fields))
        }
    }
}

/// Minimal email shape check: something before and after an `@`,
/// and a dot in the domain part.
pub fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDirectorRequest {
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_order: i64,
}

/// Partial update: omitted fields keep their prior value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDirectorRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub display_order: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn director() -> Director {
        Director {
            id: "d1".to_string(),
            name: "Jane Doe".to_string(),
            position: "Chair".to_string(),
            bio: String::new(),
            email: "jane@example.org".to_string(),
            photo: String::new(),
            display_order: 0,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn valid_director_passes() {
        assert!(director().validate().is_ok());
    }

    #[test]
    fn missing_required_fields_are_reported() {
        let mut d = director();
        d.name = "  ".to_string();
        d.email = "not-an-email".to_string();
        let err = d.validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: name, email");
    }

    #[test]
    fn empty_email_is_allowed() {
        let mut d = director();
        d.email = String::new();
        assert!(d.validate().is_ok());
    }
}
