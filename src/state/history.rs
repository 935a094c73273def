//! Completion history records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timer::{Timer, TimerId};

/// Immutable record of one timer completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: TimerId,
    pub name: String,
    pub completed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn completed(timer: &Timer, at: DateTime<Utc>) -> Self {
        Self {
            id: timer.id.clone(),
            name: timer.name.clone(),
            completed_at: at,
        }
    }
}
