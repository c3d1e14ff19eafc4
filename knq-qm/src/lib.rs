//! knq-qm library - Karaoke Night Queue Manager service
//!
//! Serves the submission/display page, the admin page, the queue API, and
//! the SSE change stream backed by the shared EventBus.

use axum::Router;
use knq_common::events::EventBus;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod queue;

use queue::QueueManager;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Change-stream bus; one SSE subscriber per open view
    pub events: Arc<EventBus>,
    /// Queue operations (submit / promote / remove / list)
    pub queue: QueueManager,
}

impl AppState {
    /// Create new application state around a connected pool
    pub fn new(db: SqlitePool) -> Self {
        let events = Arc::new(EventBus::new(100));
        let queue = QueueManager::new(db.clone(), events.clone());
        Self { db, events, queue }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};
    use tower_http::cors::CorsLayer;

    Router::new()
        // Browser views and static assets
        .route("/", get(api::serve_index))
        .route("/admin", get(api::serve_admin))
        .route("/static/app.js", get(api::serve_app_js))
        .route("/static/admin.js", get(api::serve_admin_js))
        .route("/static/knq-ui.css", get(api::serve_ui_css))
        // Queue API
        .route("/api/queue", get(api::get_queue).post(api::submit_entry))
        .route("/api/queue/:id/play", post(api::play_now))
        .route("/api/queue/:id", delete(api::remove_entry))
        // SSE change stream
        .route("/api/events", get(api::event_stream))
        // Health and build identification
        .merge(api::health_routes())
        .route("/build_info", get(api::get_build_info))
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
        .with_state(state)
}
