use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::{ApiResponse, Result};
use crate::handlers::Notified;
use crate::middleware::auth::TOKEN_COOKIE;
use crate::models::{CreateUserRequest, CurrentUser, LoginRequest, UserResponse};
use crate::services::{AuthService, Notification, UserService};
use crate::AppState;

/// Register a new user
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse> {
    let user = AuthService::register(&state.db, req).await?;

    let notification = state
        .mailer
        .send(
            &user.email,
            Notification::RegistrationConfirmation {
                name: user.name.clone(),
                email: user.email.clone(),
            },
        )
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Notified {
            record: user,
            notification,
        })),
    ))
}

/// Login and receive the session cookie
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let (token, user) = AuthService::login(&state.db, &state.config, req).await?;

    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.jwt.cookie_secure)
        .path("/")
        .max_age(time_duration_days(state.config.jwt.token_expire_days))
        .build();

    Ok((jar.add(cookie), Json(ApiResponse::success(user))))
}

/// Logout: expire the session cookie immediately
/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<impl IntoResponse> {
    let remove = Cookie::build((TOKEN_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.jwt.cookie_secure)
        .path("/")
        .build();

    Ok((
        jar.remove(remove),
        Json(ApiResponse::<()>::success_message("Logged out successfully")),
    ))
}

/// Current user profile
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let user = UserService::get_user(&state.db, &current_user.id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

fn time_duration_days(days: u64) -> time::Duration {
    time::Duration::days(days as i64)
}
