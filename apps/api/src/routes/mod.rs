pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::history::handlers as history;
use crate::state::AppState;

/// Room for multipart framing and the job description on top of the document.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;
    Router::new()
        .route("/health", get(health::health_handler))
        // Analyses
        .route(
            "/api/v1/analyses/resume",
            post(handlers::handle_analyze_resume),
        )
        .route(
            "/api/v1/analyses/linkedin",
            post(handlers::handle_analyze_linkedin),
        )
        .route(
            "/api/v1/analyses/github/profile",
            post(handlers::handle_analyze_github_profile),
        )
        .route(
            "/api/v1/analyses/github/repository",
            post(handlers::handle_analyze_github_repository),
        )
        // GitHub profile card
        .route(
            "/api/v1/github/users/:username",
            get(handlers::handle_github_user),
        )
        // History
        .route("/api/v1/history", get(history::handle_list_history))
        .route(
            "/api/v1/history/:id/report",
            get(history::handle_history_report),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
