use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use timer_deck::{
    create_router,
    error::StoreError,
    services::LogNotifier,
    state::{AppState, Settings},
    storage::{KeyValueStore, MemoryStore},
};

/// Store that holds nothing and refuses every write
#[derive(Debug)]
struct ReadOnlyStore;

#[async_trait]
impl KeyValueStore for ReadOnlyStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), StoreError> {
        Err(read_only())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        Err(read_only())
    }
}

fn read_only() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "read-only file system",
    ))
}

fn app_with(store: Arc<dyn KeyValueStore>) -> (Router, Arc<AppState>) {
    let settings = Settings {
        seed_example: false,
        ..Settings::default()
    };
    let state = Arc::new(AppState::new(settings, store, Arc::new(LogNotifier)));
    (create_router(Arc::clone(&state)), state)
}

fn app() -> (Router, Arc<AppState>) {
    app_with(Arc::new(MemoryStore::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn add(app: &Router, name: &str, category: &str, duration: Value) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/timers",
        Some(json!({ "name": name, "category": category, "duration": duration })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["timer"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn added_timers_are_listed_by_category() {
    let (app, _) = app();
    add(&app, "Pushups", "Workout", json!(30)).await;
    add(&app, "Tea", "Kitchen", json!("180")).await;
    add(&app, "Plank", "Workout", json!("60s")).await;

    let (status, body) = send(&app, Method::GET, "/timers", None).await;
    assert_eq!(status, StatusCode::OK);

    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["category"], "Workout");
    assert_eq!(groups[0]["timers"].as_array().unwrap().len(), 2);
    assert_eq!(groups[0]["timers"][1]["duration"], 60);
    assert_eq!(groups[0]["summary"]["paused"], 2);
    assert_eq!(groups[0]["disclosure"]["open"], true);
    assert_eq!(groups[1]["timers"][0]["display"], "00:03:00");
    assert_eq!(groups[1]["timers"][0]["statusLabel"], "Paused");

    let (_, categories) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(categories, json!(["Workout", "Kitchen"]));
}

#[tokio::test]
async fn incomplete_form_is_rejected() {
    let (app, state) = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/timers",
        Some(json!({ "name": "", "category": "Workout", "duration": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Please fill all fields.");

    let (status, _) = send(
        &app,
        Method::POST,
        "/timers",
        Some(json!({ "name": "Tea", "category": "Kitchen", "duration": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(state.snapshot().timers.is_empty());
}

#[tokio::test]
async fn timer_controls_change_status() {
    let (app, state) = app();
    let id = add(&app, "Tea", "Kitchen", json!(60)).await;

    let (_, body) = send(&app, Method::POST, &format!("/timers/{id}/start"), None).await;
    assert_eq!(body["groups"][0]["timers"][0]["status"], "running");

    send(&app, Method::POST, &format!("/timers/{id}/pause"), None).await;
    send(
        &app,
        Method::PATCH,
        &format!("/timers/{id}"),
        Some(json!({ "name": "Green tea" })),
    )
    .await;
    let timer = state.timer(&id.as_str().into()).unwrap();
    assert_eq!(timer.name, "Green tea");
    assert_eq!(timer.category, "Kitchen");

    let (_, body) = send(&app, Method::POST, &format!("/timers/{id}/complete"), None).await;
    assert_eq!(body["groups"][0]["timers"][0]["statusLabel"], "COMPLETED");
    assert_eq!(body["groups"][0]["timers"][0]["remaining"], 0);

    let (_, body) = send(&app, Method::POST, &format!("/timers/{id}/reset"), None).await;
    assert_eq!(body["groups"][0]["timers"][0]["remaining"], 60);
    assert_eq!(body["groups"][0]["timers"][0]["status"], "paused");

    let (_, body) = send(&app, Method::DELETE, &format!("/timers/{id}"), None).await;
    assert_eq!(body["groups"], json!([]));
}

#[tokio::test]
async fn bulk_start_touches_only_its_category() {
    let (app, _) = app();
    add(&app, "Pushups", "Workout", json!(30)).await;
    add(&app, "Tea", "Kitchen", json!(30)).await;
    add(&app, "Plank", "Workout", json!(30)).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/categories/Workout/bulk",
        Some(json!({ "action": "start" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"][0]["summary"]["running"], 2);
    assert_eq!(body["groups"][1]["summary"]["running"], 0);

    let (status, body) = send(
        &app,
        Method::POST,
        "/categories/Workout/bulk",
        Some(json!({ "action": "explode" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"][0]["summary"]["running"], 2);
}

#[tokio::test]
async fn completed_timers_show_up_in_history_and_export() {
    let (app, _) = app();
    let id = add(&app, "Tea", "Kitchen", json!(60)).await;
    send(&app, Method::POST, &format!("/timers/{id}/complete"), None).await;

    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(history["count"], 1);
    assert_eq!(history["entries"][0]["name"], "Tea");
    assert!(history["entries"][0]["completedAt"].is_string());

    let (status, exported) = send(&app, Method::GET, "/history/export", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exported, history["entries"]);

    send(&app, Method::DELETE, "/history", None).await;
    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(history["count"], 0);
}

#[tokio::test]
async fn preferences_round_trip() {
    let (app, _) = app();
    let (_, prefs) = send(&app, Method::GET, "/preferences", None).await;
    assert_eq!(prefs, json!({ "halfwayAlertsEnabled": false }));

    let (status, prefs) = send(
        &app,
        Method::PUT,
        "/preferences",
        Some(json!({ "halfwayAlertsEnabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(prefs["halfwayAlertsEnabled"], true);

    let (_, status) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status["halfway_alerts_enabled"], true);
}

#[tokio::test]
async fn toggling_a_category_collapses_it() {
    let (app, _) = app();
    add(&app, "Tea", "Kitchen", json!(60)).await;

    let (status, view) = send(&app, Method::POST, "/categories/Kitchen/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["open"], false);
    assert_eq!(view["animating"], true);

    let (status, _) = send(&app, Method::POST, "/categories/Garden/toggle", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reset_wipes_everything() {
    let (app, state) = app();
    let id = add(&app, "Tea", "Kitchen", json!(60)).await;
    send(&app, Method::POST, &format!("/timers/{id}/complete"), None).await;

    let (status, body) = send(&app, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All data has been cleared.");
    assert!(state.snapshot().timers.is_empty());
    assert!(state.history().is_empty());
}

#[tokio::test]
async fn failed_reset_reports_error_and_keeps_data() {
    let (app, state) = app_with(Arc::new(ReadOnlyStore));
    let id = add(&app, "Tea", "Kitchen", json!(60)).await;
    send(&app, Method::POST, &format!("/timers/{id}/complete"), None).await;
    add(&app, "Plank", "Workout", json!(30)).await;

    let (status, body) = send(&app, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Reset Error: "));
    assert_eq!(body["groups"].as_array().unwrap().len(), 2);

    let (_, history) = send(&app, Method::GET, "/history", None).await;
    assert_eq!(history["count"], 1);
    assert_eq!(state.snapshot().timers.len(), 2);
}

#[tokio::test]
async fn health_reports_version() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
