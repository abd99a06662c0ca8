use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::AppError;
use crate::models::{CurrentUser, UserRole};
use crate::services::AuthService;
use crate::AppState;

/// Session cookie name
pub const TOKEN_COOKIE: &str = "token";

/// Authentication middleware: validates the session token from the
/// `token` cookie (or a Bearer header) and attaches the current user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = jar
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            request
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .map(|s| s.to_string())
        })
        .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

    let claims = AuthService::validate_token(&token, &state.config)?;

    // Re-check against the database so disabled accounts and stale roles
    // are rejected even while their token is still within its lifetime.
    let (email, role, is_active): (String, String, bool) =
        sqlx::query_as("SELECT email, role, is_active FROM users WHERE id = ?")
            .bind(&claims.sub)
            .fetch_optional(state.db.pool())
            .await
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;

    if !is_active {
        return Err(AppError::Forbidden("Account is disabled".to_string()));
    }

    let current_user = CurrentUser {
        id: claims.sub,
        email,
        role: UserRole::from_str(&role),
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Authorization guard: requires the authenticated user to be an admin.
/// Must be layered inside `auth_middleware`.
pub async fn admin_guard(request: Request, next: Next) -> Result<Response, AppError> {
    let current_user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| AppError::Unauthorized("Missing session token".to_string()))?;

    if !current_user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(next.run(request).await)
}
