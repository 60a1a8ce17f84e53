use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

/// Largest diary file `/api/import` accepts.
pub const UPLOAD_LIMIT_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/entries", get(handlers::entries))
        .route("/download", get(handlers::download))
        .route("/chart.svg", get(handlers::chart_svg))
        .route("/api/entries", get(handlers::get_entries))
        .route(
            "/api/import",
            post(handlers::import).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route("/api/chart", get(handlers::get_chart))
        .route("/api/schema", get(handlers::get_schema))
        .with_state(state)
}
