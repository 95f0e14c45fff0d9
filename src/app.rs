use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

/// Large enough for a phone photo once base64 encoded.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/records",
            get(handlers::list_records).post(handlers::create_record),
        )
        .route("/api/records/:id", delete(handlers::delete_record))
        .route("/api/chart", get(handlers::get_chart))
        .route(
            "/api/avatar",
            get(handlers::get_avatar).put(handlers::put_avatar),
        )
        .route("/api/avatar/upload", post(handlers::upload_avatar))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
