use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::{User, UserResponse};

/// User administration service
pub struct UserService;

impl UserService {
    /// Get user by ID
    pub async fn get_user(db: &Database, user_id: &str) -> Result<User> {
        let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    /// List all users (admin only)
    pub async fn list_users(db: &Database) -> Result<Vec<UserResponse>> {
        let users: Vec<User> = sqlx::query_as("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(db.pool())
            .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Enable or disable an account (admin only)
    pub async fn update_user_status(
        db: &Database,
        user_id: &str,
        is_active: bool,
    ) -> Result<UserResponse> {
        // Existence check first so a bad id is NotFound, not a silent no-op
        Self::get_user(db, user_id).await?;

        let now = chrono::Utc::now().to_rfc3339();
        sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(&now)
            .bind(user_id)
            .execute(db.pool())
            .await?;

        let user = Self::get_user(db, user_id).await?;
        Ok(UserResponse::from(user))
    }
}
