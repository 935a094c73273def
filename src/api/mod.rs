//! HTTP API module
//!
//! Endpoint handlers and response structures for the timer board.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timers", get(board_handler).post(add_timer_handler))
        .route("/timers/:id", patch(rename_timer_handler).delete(delete_timer_handler))
        .route("/timers/:id/start", post(start_timer_handler))
        .route("/timers/:id/pause", post(pause_timer_handler))
        .route("/timers/:id/reset", post(reset_timer_handler))
        .route("/timers/:id/complete", post(complete_timer_handler))
        .route("/categories", get(categories_handler))
        .route("/categories/:category/bulk", post(bulk_action_handler))
        .route("/categories/:category/toggle", post(toggle_category_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/history/export", get(export_history_handler))
        .route("/preferences", get(get_preferences_handler).put(put_preferences_handler))
        .route("/reset", post(reset_all_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
