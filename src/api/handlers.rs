//! HTTP endpoint handlers

use std::{sync::Arc, time::Instant};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info, warn};

use super::responses::{
    ApiResponse, BoardResponse, BulkRequest, GroupView, HealthResponse, HistoryResponse,
    RenameRequest, StatusResponse,
};
use crate::{
    state::{AppState, BulkKind, NewTimer, Preferences, TimerId, TimerUpdate},
    view::{categories, disclosure::DisclosureView},
};

type Shared = State<Arc<AppState>>;

/// Current category groups with their disclosure state
fn board(state: &AppState) -> Vec<GroupView> {
    state
        .category_views(Instant::now())
        .into_iter()
        .map(|(group, disclosure)| GroupView::new(group, disclosure))
        .collect()
}

fn ok(state: &AppState, message: String) -> Json<ApiResponse> {
    Json(ApiResponse::ok(message, board(state)))
}

/// Handle GET /timers - Timers grouped by category
pub async fn board_handler(State(state): Shared) -> Json<BoardResponse> {
    Json(BoardResponse {
        groups: board(&state),
    })
}

/// Handle POST /timers - Add a timer from the form fields
pub async fn add_timer_handler(
    State(state): Shared,
    Json(form): Json<NewTimer>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.add_timer(form) {
        Ok(timer) => (
            StatusCode::CREATED,
            Json(
                ApiResponse::ok(format!("Timer {} added", timer.name), board(&state))
                    .with_timer(timer),
            ),
        ),
        Err(e) => {
            warn!("Rejected new timer: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(e.to_string(), board(&state))),
            )
        }
    }
}

/// Handle PATCH /timers/:id - Rename or recategorize a timer
pub async fn rename_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.update(
        &id,
        TimerUpdate {
            name: request.name.filter(|n| !n.trim().is_empty()),
            category: request.category.filter(|c| !c.trim().is_empty()),
            ..TimerUpdate::default()
        },
    );
    ok(&state, format!("Timer {} updated", id))
}

/// Handle DELETE /timers/:id
pub async fn delete_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.delete(&id);
    info!("Timer {} deleted", id);
    ok(&state, format!("Timer {} deleted", id))
}

/// Handle POST /timers/:id/start
pub async fn start_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.start(&id);
    ok(&state, format!("Timer {} started", id))
}

/// Handle POST /timers/:id/pause
pub async fn pause_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.pause(&id);
    ok(&state, format!("Timer {} paused", id))
}

/// Handle POST /timers/:id/reset
pub async fn reset_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.reset(&id);
    ok(&state, format!("Timer {} reset", id))
}

/// Handle POST /timers/:id/complete
pub async fn complete_timer_handler(
    State(state): Shared,
    Path(id): Path<String>,
) -> Json<ApiResponse> {
    let id = TimerId::new(id);
    state.complete(&id);
    ok(&state, format!("Timer {} completed", id))
}

/// Handle GET /categories - Distinct categories for the add-timer form
pub async fn categories_handler(State(state): Shared) -> Json<Vec<String>> {
    Json(categories(&state.snapshot().timers))
}

/// Handle POST /categories/:category/bulk - Start, pause or reset a category
pub async fn bulk_action_handler(
    State(state): Shared,
    Path(category): Path<String>,
    Json(request): Json<BulkRequest>,
) -> Json<ApiResponse> {
    let kind = BulkKind::parse(&request.action);
    if kind == BulkKind::Unknown {
        warn!("Unknown bulk action '{}' ignored", request.action);
    }
    state.bulk_action(&category, kind);
    ok(&state, format!("Applied {} to {}", request.action, category))
}

/// Handle POST /categories/:category/toggle - Expand or collapse a category
pub async fn toggle_category_handler(
    State(state): Shared,
    Path(category): Path<String>,
) -> Result<Json<DisclosureView>, StatusCode> {
    state
        .toggle_category(&category, Instant::now())
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// Handle GET /history - Completed timers, oldest first
pub async fn history_handler(State(state): Shared) -> Json<HistoryResponse> {
    let entries = state.history();
    Json(HistoryResponse {
        count: entries.len(),
        entries,
    })
}

/// Handle DELETE /history
pub async fn clear_history_handler(State(state): Shared) -> Json<ApiResponse> {
    state.clear_history();
    info!("History cleared");
    ok(&state, "History cleared".to_string())
}

/// Handle GET /history/export - History as shareable JSON text
pub async fn export_history_handler(State(state): Shared) -> Response {
    match state.export_history() {
        Ok(text) => (
            [
                (header::CONTENT_TYPE, "application/json"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"timer-history.json\"",
                ),
            ],
            text,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Export Error: {}", e), Vec::new())),
            )
                .into_response()
        }
    }
}

/// Handle GET /preferences
pub async fn get_preferences_handler(State(state): Shared) -> Json<Preferences> {
    Json(state.preferences())
}

/// Handle PUT /preferences
pub async fn put_preferences_handler(
    State(state): Shared,
    Json(prefs): Json<Preferences>,
) -> Json<Preferences> {
    Json(state.set_preferences(prefs).await)
}

/// Handle POST /reset - Delete all timers, history and preferences
pub async fn reset_all_handler(State(state): Shared) -> (StatusCode, Json<ApiResponse>) {
    match state.reset_all().await {
        Ok(()) => (
            StatusCode::OK,
            ok(&state, "All data has been cleared.".to_string()),
        ),
        Err(e) => {
            error!("Failed to reset all data: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Reset Error: {}", e), board(&state))),
            )
        }
    }
}

/// Handle GET /status - Return current counts and server metadata
pub async fn status_handler(State(state): Shared) -> Json<StatusResponse> {
    let data = state.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timers: data.timers.len(),
        running: data.timers.iter().filter(|t| t.is_running()).count(),
        completed: data.timers.iter().filter(|t| t.is_completed()).count(),
        history: data.history.len(),
        halfway_alerts_enabled: state.preferences().halfway_alerts_enabled,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
