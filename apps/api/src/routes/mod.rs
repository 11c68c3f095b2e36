pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis_handlers;
use crate::auth::handlers as auth_handlers;
use crate::documents::handlers as document_handlers;
use crate::documents::storage::MAX_FILE_SIZE;
use crate::questionnaire::handlers as questionnaire_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/auth/login", post(auth_handlers::handle_login))
        .route("/api/auth/refresh", post(auth_handlers::handle_refresh))
        .route("/api/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/auth/me", get(auth_handlers::handle_me))
        // Documents
        .route(
            "/api/documents/upload",
            post(document_handlers::handle_upload),
        )
        .route("/api/documents", get(document_handlers::handle_list))
        .route(
            "/api/documents/:id",
            get(document_handlers::handle_get).delete(document_handlers::handle_delete),
        )
        // Analysis
        .route("/api/analysis/start", post(analysis_handlers::handle_start))
        .route("/api/analysis", get(analysis_handlers::handle_list))
        .route(
            "/api/analysis/latest/status",
            get(analysis_handlers::handle_latest_status),
        )
        .route("/api/analysis/:id", get(analysis_handlers::handle_get))
        .route(
            "/api/analysis/:id/ipp-progress",
            get(analysis_handlers::handle_ipp_progress),
        )
        // Questionnaire
        .route(
            "/api/questionnaire/background",
            post(questionnaire_handlers::handle_create),
        )
        .route(
            "/api/questionnaire/background/latest",
            get(questionnaire_handlers::handle_latest),
        )
        .route(
            "/api/questionnaire/background/:id",
            put(questionnaire_handlers::handle_update),
        )
        // Multipart bodies carry up to a 10MB file plus form overhead.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
        .with_state(state)
}
