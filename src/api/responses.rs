//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{HistoryEntry, Timer},
    utils::format_duration,
    view::{disclosure::DisclosureView, grouping::GroupSummary, CategoryGroup},
};

/// Timer with its display values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    /// Remaining time as `HH:MM:SS`
    pub display: String,
    pub progress_pct: f64,
    pub status_label: &'static str,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        Self {
            display: format_duration(timer.remaining as i64),
            progress_pct: timer.progress_pct(),
            status_label: timer.status.label(),
            timer,
        }
    }
}

/// One category section: its timers, footer counts and disclosure state
#[derive(Debug, Clone, Serialize)]
pub struct GroupView {
    pub category: String,
    pub timers: Vec<TimerView>,
    pub summary: GroupSummary,
    pub disclosure: DisclosureView,
}

impl GroupView {
    pub fn new(group: CategoryGroup, disclosure: DisclosureView) -> Self {
        let summary = group.summary();
        Self {
            category: group.category,
            timers: group.timers.into_iter().map(TimerView::from).collect(),
            summary,
            disclosure,
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerView>,
    pub groups: Vec<GroupView>,
}

impl ApiResponse {
    pub fn new(status: &str, message: String, groups: Vec<GroupView>) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer: None,
            groups,
        }
    }

    pub fn ok(message: String, groups: Vec<GroupView>) -> Self {
        Self::new("ok", message, groups)
    }

    pub fn error(message: String, groups: Vec<GroupView>) -> Self {
        Self::new("error", message, groups)
    }

    pub fn with_timer(mut self, timer: Timer) -> Self {
        self.timer = Some(TimerView::from(timer));
        self
    }
}

/// Body of `GET /timers`
#[derive(Debug, Clone, Serialize)]
pub struct BoardResponse {
    pub groups: Vec<GroupView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub entries: Vec<HistoryEntry>,
}

/// Body of `POST /categories/:category/bulk`
#[derive(Debug, Clone, Deserialize)]
pub struct BulkRequest {
    pub action: String,
}

/// Body of `PATCH /timers/:id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Status response with timer counts and server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub running: usize,
    pub completed: usize,
    pub history: usize,
    pub halfway_alerts_enabled: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
