pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::services::{Mailer, MediaLifecycle};
use crate::storage::LocalMediaStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub media: Arc<MediaLifecycle>,
    pub mailer: Arc<Mailer>,
}

impl AppState {
    /// Build the state from a loaded configuration
    pub async fn new(config: Config) -> error::Result<Self> {
        let db = Database::new(&config.database.path).await?;
        db.run_migrations().await?;

        let store = Arc::new(LocalMediaStore::new(&config.storage.uploads_path));
        let media = Arc::new(MediaLifecycle::new(store, &config.storage.public_prefix));
        let mailer = Arc::new(Mailer::from_config(&config.smtp));

        Ok(Self {
            db,
            config: Arc::new(config),
            media,
            mailer,
        })
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes: site content reads plus the two public forms
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/directors", get(handlers::director::list))
        .route("/directors/:id", get(handlers::director::get))
        .route("/gallery", get(handlers::gallery::list))
        .route("/gallery/:id", get(handlers::gallery::get))
        .route("/events", get(handlers::event::list))
        .route("/events/:id", get(handlers::event::get))
        .route("/donations", post(handlers::donation::create))
        .route("/inquiries", post(handlers::inquiry::create));

    // Authenticated, non-admin routes
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me));

    // Admin routes: all mutations plus donation/inquiry reads
    let admin_routes = Router::new()
        .route("/directors", post(handlers::director::create))
        .route(
            "/directors/:id",
            put(handlers::director::update).delete(handlers::director::delete),
        )
        .route("/directors/:id/photo", post(handlers::director::upload_photo))
        .route("/gallery", post(handlers::gallery::create))
        .route(
            "/gallery/:id",
            put(handlers::gallery::update).delete(handlers::gallery::delete),
        )
        .route("/gallery/:id/media", post(handlers::gallery::upload_media))
        .route(
            "/gallery/:id/thumbnail",
            post(handlers::gallery::upload_thumbnail),
        )
        .route("/events", post(handlers::event::create))
        .route(
            "/events/:id",
            put(handlers::event::update).delete(handlers::event::delete),
        )
        .route("/donations", get(handlers::donation::list))
        .route(
            "/donations/:id",
            get(handlers::donation::get)
                .put(handlers::donation::update)
                .delete(handlers::donation::delete),
        )
        .route("/inquiries", get(handlers::inquiry::list))
        .route(
            "/inquiries/:id",
            get(handlers::inquiry::get)
                .put(handlers::inquiry::update)
                .delete(handlers::inquiry::delete),
        )
        .route("/inquiries/:id/respond", put(handlers::inquiry::respond))
        .route("/users", get(handlers::user::list))
        .route("/users/:id/status", put(handlers::user::update_status))
        .layer(axum::middleware::from_fn(middleware::auth::admin_guard));

    let protected_routes = session_routes.merge(admin_routes).layer(
        axum::middleware::from_fn_with_state(state.clone(), middleware::auth::auth_middleware),
    );

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .nest_service(
            &state.config.storage.public_prefix,
            ServeDir::new(&state.config.storage.uploads_path),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
